pub mod phase_mapper;
pub mod request_dedup;
pub mod submission_encoder;

pub use phase_mapper::{PhaseMapper, PhaseVocabulary};
pub use request_dedup::RequestDeduplicator;
pub use submission_encoder::encode_submission;
