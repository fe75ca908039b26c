/// Multi-format date parsing with an instance-scoped format hint.
pub mod date;
/// History merging and raw-observation normalization.
pub mod merge;
