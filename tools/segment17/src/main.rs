//! 读取一个病例的五个解剖掩膜, 计算 AHA 17 节段并写回 nifti 文件.

use clap::Parser;
use std::path::PathBuf;

mod result;
mod runner;

/// 左心室心肌 AHA 17 节段划分.
#[derive(Parser, Debug)]
#[command(author, about, version)]
pub struct Args {
    /// 病例目录. 缺省时使用 `$MYO_CASE_DIR` 或 `$HOME/dataset/heart`.
    #[arg(short, long)]
    case: Option<PathBuf>,

    /// 输出目录. 缺省时写入病例目录.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML 配置文件.
    #[arg(long)]
    config: Option<PathBuf>,

    /// 工作线程数. 缺省时使用全部核心.
    #[arg(short, long)]
    threads: Option<usize>,

    /// 额外写出合并后的标签体积 `SEGMENTS.nii.gz`.
    #[arg(long, default_value_t = false)]
    label_map: bool,

    /// 输出调试日志.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    utils::init_logger(args.verbose);

    match runner::run(&args) {
        Ok(result) => result.analyze(),
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}
