//! 程序运行函数.

use crate::result::RunResult;
use crate::Args;
use myo_berry::aha::generate_left_ventricle_segments;
use myo_berry::dataset;
use myo_berry::SegmentError;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use utils::loader::{self, LoadConfigError};

/// 运行错误.
#[derive(Error, Debug)]
pub enum RunError {
    /// 找不到病例目录.
    #[error("case directory not found: {0:?}")]
    NoCase(Option<PathBuf>),
    /// 配置错误.
    #[error(transparent)]
    Config(#[from] LoadConfigError),
    /// 线程池创建失败.
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// 划分失败.
    #[error(transparent)]
    Segment(#[from] SegmentError),
}

/// 实际运行.
pub fn run(args: &Args) -> Result<RunResult, RunError> {
    let threads = args.threads.unwrap_or_else(utils::cpus).max(1);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;

    let case = args
        .case
        .clone()
        .or_else(loader::case_dir_from_env_or_home)
        .filter(|p| p.is_dir())
        .ok_or_else(|| RunError::NoCase(args.case.clone()))?;
    let config = loader::load_config(args.config.as_ref())?;
    config.validate()?;
    let output = args.output.clone().unwrap_or_else(|| case.clone());

    log::info!("Loading case {}", case.display());
    let masks = dataset::load_case(&case, &config.labels)?;

    let start = Instant::now();
    let segments = generate_left_ventricle_segments(&masks, &config)?;
    let elapsed = start.elapsed();

    let mut files = dataset::save_segments(&output, &segments)?;
    if args.label_map {
        let path = output.join("SEGMENTS.nii.gz");
        dataset::save_label_map(&path, &segments)?;
        files.push(path);
    }

    Ok(RunResult::new(case, files, segments.summary(), elapsed, threads))
}
