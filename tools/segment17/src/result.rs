//! 运行结果.

use myo_berry::aha::SegmentSummary;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

/// 将 `summary` 的结果写进 `w` 中.
fn describe_into<W: Write>(summary: &[SegmentSummary], w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    writeln!(w, "Segments:")?;
    for s in summary {
        writeln!(
            w,
            "{S4}#{:<2} {:<22} {:>8} voxels {:>10.3} mL",
            s.id.get(),
            s.id.name(),
            s.voxels,
            s.volume_ml
        )?;
    }
    let voxels: usize = summary.iter().map(|s| s.voxels).sum();
    let ml: f64 = summary.iter().map(|s| s.volume_ml).sum();
    write!(w, "{S4}Total: {voxels} voxels, {ml:.3} mL")?;
    Ok(())
}

/// 一次划分的最终结果.
pub struct RunResult {
    case: PathBuf,
    files: Vec<PathBuf>,
    summary: Vec<SegmentSummary>,
    elapsed: Duration,
    threads: usize,
}

impl RunResult {
    pub fn new(
        case: PathBuf,
        files: Vec<PathBuf>,
        summary: Vec<SegmentSummary>,
        elapsed: Duration,
        threads: usize,
    ) -> Self {
        Self {
            case,
            files,
            summary,
            elapsed,
            threads,
        }
    }

    /// 输出运行结果.
    pub fn analyze(&self) {
        utils::sep();
        println!("Case: {}", self.case.display());
        println!(
            "Segmentation took {} ms on {} threads",
            self.elapsed.as_millis(),
            self.threads
        );
        utils::sep();

        let mut buf = Vec::with_capacity(2048);
        match describe_into(&self.summary, &mut buf) {
            Ok(()) => println!("{}", String::from_utf8_lossy(&buf)),
            Err(e) => log::error!("{e}"),
        }
        utils::sep();

        for f in self.files.iter() {
            println!("Wrote {}", f.display());
        }
    }
}
