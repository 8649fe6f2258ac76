pub mod diagnose_pipeline;
