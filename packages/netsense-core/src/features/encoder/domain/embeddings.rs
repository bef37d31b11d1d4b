//! Learned node embeddings

/// Dense `N × H` embedding matrix, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Embeddings {
    n_nodes: usize,
    dim: usize,
    data: Vec<f32>,
}

impl Embeddings {
    /// `None` when `data.len() != n_nodes * dim`
    pub fn new(n_nodes: usize, dim: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == n_nodes * dim).then_some(Self { n_nodes, dim, data })
    }

    pub fn from_rows(rows: Vec<Vec<f32>>) -> Option<Self> {
        let n_nodes = rows.len();
        let dim = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != dim) {
            return None;
        }
        Self::new(n_nodes, dim, rows.into_iter().flatten().collect())
    }

    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks(self.dim.max(1)).take(self.n_nodes)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
