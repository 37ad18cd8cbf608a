use std::sync::Arc;

use anyhow::Error;

use timing_application::{
    AnalyzeStructureUseCase, AnalyzeStructureUseCaseImpl, TimeLyricsUseCase, TimeLyricsUseCaseImpl,
};
use timing_configuration::AppConfig;
use timing_domain::{LyricAlignmentPort, StructureAnalysisPort};
use timing_infra_align::{VocalAlignAdapterConfig, VocalAlignTimingAdapter};
use timing_infra_structure::StructureAnalysisAdapter;
use vocal_align::BackendInitConfig;

pub struct Application {
    pub config: AppConfig,
    pub time_lyrics: Arc<dyn TimeLyricsUseCase>,
    pub analyze_structure: Arc<dyn AnalyzeStructureUseCase>,
}

impl Application {
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        tracing::info!(
            default_sample_rate_hz = config.timing.default_sample_rate_hz,
            device = %config.timing.device,
            dictionary_path = ?config.timing.dictionary_path,
            "initializing timing application"
        );

        let adapter_cfg = VocalAlignAdapterConfig {
            dictionary_path: config.timing.dictionary_path.clone(),
            backend: BackendInitConfig {
                intra_op_threads: config.timing.intra_op_threads,
                device: config.timing.device.clone(),
            },
            engine: config.aligner.clone(),
        };
        let aligner: Arc<dyn LyricAlignmentPort> = Arc::new(
            VocalAlignTimingAdapter::load(&adapter_cfg)
                .map_err(|err| anyhow::anyhow!("aligner initialization failed: {err}"))?,
        );
        let analyzer: Arc<dyn StructureAnalysisPort> =
            Arc::new(StructureAnalysisAdapter::new(config.structure.clone()));

        let time_lyrics: Arc<dyn TimeLyricsUseCase> = Arc::new(TimeLyricsUseCaseImpl::new(
            aligner,
            config.timing.default_sample_rate_hz,
        ));
        let analyze_structure: Arc<dyn AnalyzeStructureUseCase> = Arc::new(
            AnalyzeStructureUseCaseImpl::new(analyzer, config.timing.default_sample_rate_hz),
        );

        Ok(Self {
            config,
            time_lyrics,
            analyze_structure,
        })
    }
}
