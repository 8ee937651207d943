/// One undirected edge as read from the input, endpoints in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Edge(pub u32, pub u32);

impl Edge
{
    /// The larger endpoint, i.e. the smallest `max_node_id` that covers this edge.
    pub fn max_endpoint(&self) -> u32
    {
        std::cmp::max(self.0, self.1)
    }
}

impl<T: Into<u32> + Copy> From<[T; 2]> for Edge
{
    fn from(arr: [T; 2]) -> Self
    {
        Self(arr[0].into(), arr[1].into())
    }
}

impl<T: Into<u32> + Copy> From<(T, T)> for Edge
{
    fn from(tup: (T, T)) -> Self
    {
        Self(tup.0.into(), tup.1.into())
    }
}
