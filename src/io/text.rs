// adjbin converts undirected edge lists into binary adjacency records
// Copyright (C) 2022 Jacob Konrad
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::io::BufRead;

use crate::{
    error::{Error, Result},
    Edge,
};

fn parse_id(token: &str, line: usize) -> Result<u32>
{
    match token.parse::<u32>() {
        Ok(0) => Err(Error::ReservedId { line }),
        Ok(id) => Ok(id),
        Err(_) => Err(Error::Parse {
            line,
            token: token.to_owned(),
        }),
    }
}

/// Parses one line of an edge list.
///
/// Blank lines, `#` comments and lines with fewer than two tokens yield
/// `Ok(None)`. Tokens after the second are ignored.
pub fn parse_line(line: &str, number: usize) -> Result<Option<Edge>>
{
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(u), Some(v)) => Ok(Some(Edge(parse_id(u, number)?, parse_id(v, number)?))),
        _ => Ok(None),
    }
}

/// Streams the edges of a text edge list one line at a time, reusing a
/// single line buffer.
pub struct EdgeLines<R: BufRead>
{
    reader: R,
    buf: String,
    line: usize,
    failed: bool,
}

impl<R: BufRead> EdgeLines<R>
{
    pub fn new(reader: R) -> Self
    {
        Self {
            reader,
            buf: String::new(),
            line: 0,
            failed: false,
        }
    }

    /// Number of lines consumed so far, skipped ones included.
    pub fn lines_read(&self) -> usize
    {
        self.line
    }
}

impl<R: BufRead> Iterator for EdgeLines<R>
{
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item>
    {
        if self.failed {
            return None;
        }
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    match parse_line(&self.buf, self.line) {
                        Ok(Some(edge)) => return Some(Ok(edge)),
                        Ok(None) => {}
                        Err(e) => {
                            self.failed = true;
                            return Some(Err(e));
                        }
                    }
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
