//! 病例数据的读写.
//!
//! 一个病例是一个目录, 其中每个解剖结构保存为 `<LABEL>.nii.gz` (或 `<LABEL>.nii`).
//! 17 个节段保存为同一目录下的 `SEGMENT_<n>.nii.gz`.

use std::path::{Path, PathBuf};

use nifti::writer::WriterOptions;

use crate::aha::{AnatomicalMasks, Labels, SegmentId, Segments};
use crate::{Mask, Result, SegmentError};

/// 获取 `{用户主目录}/dataset` 目录.
pub fn home_dataset_dir() -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("dataset");
    Some(ans)
}

/// 获取 `{用户主目录}/dataset` 目录下给定继续项组成的全路径.
pub fn home_dataset_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = home_dataset_dir()?;
    ans.extend(it);
    Some(ans)
}

/// 结构 `label` 在病例目录 `dir` 下的文件. 优先使用压缩格式, 都不存在时返回 `None`.
pub fn structure_path<P: AsRef<Path>>(dir: P, label: &str) -> Option<PathBuf> {
    ["nii.gz", "nii"]
        .into_iter()
        .map(|ext| dir.as_ref().join(format!("{label}.{ext}")))
        .find(|p| p.is_file())
}

/// 节段 `id` 的文件名.
#[inline]
pub fn segment_filename(id: SegmentId) -> String {
    format!("SEGMENT_{id}.nii.gz")
}

/// 读取病例目录 `dir` 下 `labels` 指定的五个掩膜.
///
/// 缺少文件时返回 [`SegmentError::MissingStructure`].
pub fn load_case<P: AsRef<Path>>(dir: P, labels: &Labels) -> Result<AnatomicalMasks> {
    let dir = dir.as_ref();
    let mut masks = AnatomicalMasks::new();
    for label in labels.all() {
        let path = structure_path(dir, label)
            .ok_or_else(|| SegmentError::MissingStructure(label.to_string()))?;
        log::debug!("读取 {}", path.display());
        masks.insert(label, Mask::open(path)?);
    }
    Ok(masks)
}

/// 从病例名称列表和根目录创建病例加载器.
///
/// # 注意
///
/// `root` 必须是目录, 否则程序 panic. 每个病例对应 `root` 下的同名子目录,
/// 加载失败时加载器在迭代时返回 `Err`.
pub fn case_loader<I, S, P>(cases: I, root: P, labels: Labels) -> CaseLoader
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    P: AsRef<Path>,
{
    let root = root.as_ref().to_owned();
    assert!(root.is_dir());

    let mut cases: Vec<String> = cases.into_iter().map(Into::into).collect();
    cases.reverse();

    CaseLoader {
        root,
        cases_rev: cases,
        labels,
    }
}

/// 列出 `root` 下的全部子目录名称 (按字典序), 作为病例名称.
pub fn list_cases<P: AsRef<Path>>(root: P) -> Result<Vec<String>> {
    let mut ans = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            ans.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    ans.sort();
    Ok(ans)
}

/// 病例加载器.
pub struct CaseLoader {
    root: PathBuf,
    cases_rev: Vec<String>,
    labels: Labels,
}

impl Iterator for CaseLoader {
    type Item = (String, Result<AnatomicalMasks>);

    fn next(&mut self) -> Option<Self::Item> {
        let case = self.cases_rev.pop()?;

        self.root.push(&case);
        let data = load_case(self.root.as_path(), &self.labels);
        self.root.pop();

        Some((case, data))
    }
}

impl ExactSizeIterator for CaseLoader {
    #[inline]
    fn len(&self) -> usize {
        self.cases_rev.len()
    }
}

/// 将 17 个节段写入目录 `dir` (不存在时创建), 返回写入的文件.
pub fn save_segments<P: AsRef<Path>>(dir: P, segments: &Segments) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    segments
        .iter()
        .map(|(id, mask)| {
            let path = dir.join(segment_filename(id));
            mask.save(&path)?;
            Ok(path)
        })
        .collect()
}

/// 将节段合并为单个标签体积 (体素值为节段编号) 写入 `path`.
pub fn save_label_map<P: AsRef<Path>>(path: P, segments: &Segments) -> Result<()> {
    let header = segments.geometry().to_nifti_header();
    let map = segments.label_map();
    // [z, y, x] -> [x, y, z].
    WriterOptions::new(path.as_ref())
        .reference_header(&header)
        .write_nifti(&map.view().reversed_axes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phantom::PhantomHeart;

    fn small_phantom() -> PhantomHeart {
        PhantomHeart {
            size: [24, 24, 30],
            center: (12.0, 12.0),
            lv_radius: 5.0,
            apex_z: 3,
            cap_height: 3,
            base_z: 18,
            mv: (2, 3.0),
            la: (6, 4.0),
            rv_radius: (6.0, 9.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_case_round_trip() {
        let root = tempfile::tempdir().unwrap();
        let labels = Labels::default();
        let masks = small_phantom().build(&labels);
        let case = root.path().join("case_01");
        std::fs::create_dir_all(&case).unwrap();
        for (name, mask) in masks.iter() {
            mask.save(case.join(format!("{name}.nii.gz"))).unwrap();
        }

        let loaded = load_case(&case, &labels).unwrap();
        for (name, mask) in masks.iter() {
            let got = loaded.get(name).unwrap();
            assert_eq!(got.data(), mask.data());
            assert!(got.is_compatible(mask));
        }

        std::fs::create_dir_all(root.path().join("case_02")).unwrap();
        let cases = list_cases(root.path()).unwrap();
        assert_eq!(cases, ["case_01", "case_02"]);

        let mut loader = case_loader(cases, root.path(), labels.clone());
        assert_eq!(loader.len(), 2);
        let (name, first) = loader.next().unwrap();
        assert_eq!(name, "case_01");
        assert!(first.is_ok());
        let (_, second) = loader.next().unwrap();
        assert!(matches!(second, Err(SegmentError::MissingStructure(_))));
        assert!(loader.next().is_none());
    }

    #[test]
    fn test_save_segments() {
        let out = tempfile::tempdir().unwrap();
        let geo = small_phantom().geometry();
        let mut masks = vec![Mask::zeros(geo); 17];
        masks[2][(5, 6, 7)] = 1;
        let segments = Segments::new(masks);

        let files = save_segments(out.path().join("seg"), &segments).unwrap();
        assert_eq!(files.len(), 17);
        assert!(files[16].ends_with("SEGMENT_17.nii.gz"));
        let third = Mask::open(&files[2]).unwrap();
        assert_eq!(third.count(), 1);
        assert_eq!(third[(5, 6, 7)], 1);

        let map_path = out.path().join("labels.nii.gz");
        save_label_map(&map_path, &segments).unwrap();
        assert!(map_path.is_file());
    }
}
