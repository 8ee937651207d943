//! The whole edge list to binary adjacency pipeline.

use std::{
    ffi::OsString,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use tracing::{info, warn};

use crate::{
    csr::Csr,
    degree::Degrees,
    encoder::{self, Encoded},
    error::Result,
    io::EdgeSource,
    progress::{Progress, DEFAULT_PROGRESS_INTERVAL},
    relabel::Relabeling,
    DEFAULT_FEATURE_ID_CEILING, MEBIBYTE,
};

/// Conversion settings, built like the rest of the crate's builders:
/// every setter consumes and returns the builder.
#[derive(Debug, Clone)]
pub struct Converter
{
    relabel: bool,
    feature_id_ceiling: u32,
    progress: bool,
    progress_interval: usize,
    num_threads: usize,
}

/// Statistics of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary
{
    pub num_edges: usize,
    pub max_node_id: u32,
    pub num_active: usize,
    pub total_neighbors: usize,
    /// Number of relabeled feature ids, `None` without relabeling.
    pub num_feature_ids: Option<u32>,
    pub bytes_written: u64,
    pub ceiling_exceeded: bool,
}

impl Default for Converter
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl Converter
{
    pub fn new() -> Self
    {
        Self {
            relabel: true,
            feature_id_ceiling: DEFAULT_FEATURE_ID_CEILING,
            progress: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            num_threads: num_cpus::get(),
        }
    }

    /// Replace neighbor ids by frequency ranks (1 = least frequent).
    pub fn relabel(self, relabel: bool) -> Self
    {
        Self { relabel, ..self }
    }

    /// Largest feature id the downstream reader accepts. Exceeding it only
    /// warns.
    pub fn feature_id_ceiling(self, feature_id_ceiling: u32) -> Self
    {
        Self {
            feature_id_ceiling,
            ..self
        }
    }

    pub fn progress(self, progress: bool) -> Self
    {
        Self { progress, ..self }
    }

    pub fn progress_interval(self, progress_interval: usize) -> Self
    {
        Self {
            progress_interval,
            ..self
        }
    }

    /// Width of the thread pool used for sorting and relabeling. The output
    /// is the same for every width.
    pub fn num_threads(self, num_threads: usize) -> Self
    {
        Self {
            num_threads: std::cmp::max(num_threads, 1),
            ..self
        }
    }

    /// Converts `source` and writes the result to `output`.
    ///
    /// The records go to a sibling `.partial` file that is renamed over
    /// `output` only after everything was written and synced, so a failed run
    /// never leaves a truncated `output` behind.
    pub fn run<S, P>(&self, source: &S, output: P) -> Result<Summary>
    where
        S: EdgeSource + ?Sized,
        P: AsRef<Path>,
    {
        let output = output.as_ref();
        let start = Instant::now();
        let progress = Progress::new(self.progress, self.progress_interval);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()?;

        info!("pass 1: counting degrees");
        let degrees = Degrees::count(source.edges()?)?;

        let relabeling = if self.relabel {
            info!("building feature id mapping, least frequent first");
            Some(Relabeling::by_frequency(&degrees))
        }
        else {
            None
        };

        info!("pass 2: building adjacency");
        let mut csr = Csr::build(&degrees, source)?;

        if let Some(relabeling) = &relabeling {
            info!("mapping neighbor ids to feature ids");
            pool.install(|| relabeling.apply(csr.neighbors_mut()))?;
        }

        info!("sorting neighbor lists");
        let num_active = degrees.num_active();
        pool.install(|| csr.sort_neighbors(&progress, num_active));

        let order = encoder::emission_order(&degrees);

        info!("writing {}", output.display());
        let encoded = write_atomically(output, |writer| {
            encoder::encode(writer, &csr, &order, &progress)
        })?;

        let num_feature_ids = relabeling.as_ref().map(Relabeling::num_ids);
        let mut ceiling_exceeded = false;
        if let Some(n) = num_feature_ids.filter(|&n| n > self.feature_id_ceiling) {
            warn!(
                "{} distinct features exceed the downstream max feature id of {}, raise it to at least {}",
                n, self.feature_id_ceiling, n
            );
            ceiling_exceeded = true;
        }

        info!(
            "done in {:.2?}: {} records, {} bytes",
            start.elapsed(),
            encoded.records,
            encoded.bytes
        );

        Ok(Summary {
            num_edges: degrees.num_edges(),
            max_node_id: degrees.max_node_id(),
            num_active,
            total_neighbors: degrees.total_neighbors(),
            num_feature_ids,
            bytes_written: encoded.bytes,
            ceiling_exceeded,
        })
    }
}

fn partial_path(output: &Path) -> PathBuf
{
    let mut name = output
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".partial");
    output.with_file_name(name)
}

fn write_atomically<F>(output: &Path, write: F) -> Result<Encoded>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<Encoded>,
{
    let partial = partial_path(output);
    let result = (|| -> Result<Encoded> {
        let mut writer = BufWriter::with_capacity(MEBIBYTE, File::create(&partial)?);
        let encoded = write(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);
        fs::rename(&partial, output)?;
        Ok(encoded)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}
