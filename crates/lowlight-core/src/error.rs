use lowlight_creature::GeneError;
use thiserror::Error;

/// Invalid configuration handed to the engine
#[derive(Debug, Error)]
pub enum LifeError {
    #[error("world must be at least one cell wide and tall (got {width}x{height})")]
    EmptyWorld { width: u32, height: u32 },
    #[error("cell size must be positive (got {0})")]
    CellSize(f32),
    #[error("max elevation {requested} exceeds the catalog maximum {available}")]
    Elevation { requested: i32, available: i32 },
    #[error("octave weights must be non-empty and strictly positive")]
    OctaveWeights,
    #[error("grid holds {actual} cells, expected {expected}")]
    GridSize { expected: usize, actual: usize },
    #[error("unknown biome `{0}`")]
    UnknownBiome(String),
    #[error("invalid genes for {species}: {source}")]
    Genes {
        species: &'static str,
        #[source]
        source: GeneError,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] ron::Error),
}
