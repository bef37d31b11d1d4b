//! Per-node structural feature table

use serde::{Deserialize, Serialize};

use crate::features::netlist_graph::NodeId;
use crate::shared::minmax_norm;

/// Number of structural features per node
pub const FEATURE_COUNT: usize = 12;

/// Offset added to a distance before inversion
pub const INVERSE_DISTANCE_EPSILON: f64 = 1e-6;

/// Structural features in their fixed column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructuralFeature {
    InDegree,
    OutDegree,
    PageRank,
    Betweenness,
    Eigenvector,
    DistMinInv,
    DistAvgInv,
    Reconvergence,
    NearFlipFlop,
    NameLength,
    Depth,
    IsOutput,
}

impl StructuralFeature {
    pub const ALL: [StructuralFeature; FEATURE_COUNT] = [
        StructuralFeature::InDegree,
        StructuralFeature::OutDegree,
        StructuralFeature::PageRank,
        StructuralFeature::Betweenness,
        StructuralFeature::Eigenvector,
        StructuralFeature::DistMinInv,
        StructuralFeature::DistAvgInv,
        StructuralFeature::Reconvergence,
        StructuralFeature::NearFlipFlop,
        StructuralFeature::NameLength,
        StructuralFeature::Depth,
        StructuralFeature::IsOutput,
    ];

    /// Column index
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StructuralFeature::InDegree => "in_deg",
            StructuralFeature::OutDegree => "out_deg",
            StructuralFeature::PageRank => "pagerank",
            StructuralFeature::Betweenness => "betweenness",
            StructuralFeature::Eigenvector => "eigen",
            StructuralFeature::DistMinInv => "dist_min_inv",
            StructuralFeature::DistAvgInv => "dist_avg_inv",
            StructuralFeature::Reconvergence => "reconv",
            StructuralFeature::NearFlipFlop => "near_ff",
            StructuralFeature::NameLength => "name_len",
            StructuralFeature::Depth => "depth",
            StructuralFeature::IsOutput => "is_output",
        }
    }

    /// Flag features are emitted as-is (0.0 or 1.0), never min-max scaled
    pub fn is_flag(self) -> bool {
        matches!(
            self,
            StructuralFeature::NearFlipFlop | StructuralFeature::IsOutput
        )
    }
}

/// Raw (unnormalized) per-node metrics, one column per feature.
///
/// Distances are stored as hop counts with the sentinel already applied.
#[derive(Debug, Clone, Default)]
pub struct RawMetrics {
    pub in_degree: Vec<f64>,
    pub out_degree: Vec<f64>,
    pub pagerank: Vec<f64>,
    pub betweenness: Vec<f64>,
    pub eigenvector: Vec<f64>,
    pub dist_min: Vec<f64>,
    pub dist_avg: Vec<f64>,
    pub reconvergence: Vec<f64>,
    pub near_flip_flop: Vec<f64>,
    pub name_length: Vec<f64>,
    pub depth: Vec<f64>,
    pub is_output: Vec<f64>,
}

impl RawMetrics {
    /// Normalize every continuous column and assemble the feature table
    pub fn normalize(self) -> FeatureTable {
        let invert = |d: &[f64]| -> Vec<f64> {
            d.iter()
                .map(|&v| 1.0 / (v + INVERSE_DISTANCE_EPSILON))
                .collect()
        };

        let columns: [Vec<f64>; FEATURE_COUNT] = [
            minmax_norm(&self.in_degree),
            minmax_norm(&self.out_degree),
            minmax_norm(&self.pagerank),
            minmax_norm(&self.betweenness),
            minmax_norm(&self.eigenvector),
            minmax_norm(&invert(&self.dist_min)),
            minmax_norm(&invert(&self.dist_avg)),
            minmax_norm(&self.reconvergence),
            self.near_flip_flop,
            minmax_norm(&self.name_length),
            minmax_norm(&self.depth),
            self.is_output,
        ];

        FeatureTable::from_columns(&columns)
    }
}

/// Normalized feature rows indexed by node id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    rows: Vec<[f64; FEATURE_COUNT]>,
}

impl FeatureTable {
    pub fn new(rows: Vec<[f64; FEATURE_COUNT]>) -> Self {
        Self { rows }
    }

    /// Build from column vectors of equal length
    pub fn from_columns(columns: &[Vec<f64>; FEATURE_COUNT]) -> Self {
        let n = columns[0].len();
        let rows = (0..n)
            .map(|i| {
                let mut row = [0.0; FEATURE_COUNT];
                for (c, column) in columns.iter().enumerate() {
                    row[c] = column.get(i).copied().unwrap_or(0.0);
                }
                row
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: NodeId) -> &[f64; FEATURE_COUNT] {
        &self.rows[id as usize]
    }

    pub fn rows(&self) -> &[[f64; FEATURE_COUNT]] {
        &self.rows
    }

    #[inline]
    pub fn get(&self, id: NodeId, feature: StructuralFeature) -> f64 {
        self.rows[id as usize][feature.index()]
    }

    /// Copy one feature column
    pub fn column(&self, feature: StructuralFeature) -> Vec<f64> {
        self.rows.iter().map(|r| r[feature.index()]).collect()
    }
}
