//! Output folder and file naming per export scope

use crate::config::OutputLayout;
use crate::product::{folder_name, slugify};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Breadth of an export operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportScope {
    /// One product, named by its title
    Product { title: String },
    /// One catalogue, named by its displayed heading
    Catalogue { name: String },
    /// Every catalogue reachable from the site root
    Site { name: String },
}

/// Where one export writes its CSV and images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub csv_path: PathBuf,
    pub image_dir: PathBuf,
}

/// Day stamp embedded in CSV file names
pub fn date_stamp(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Second-resolution stamp embedded in image file names
pub fn time_stamp(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%d_%H%M%S").to_string()
}

/// Keeps a display name usable as a single path component
fn file_stem(name: &str) -> String {
    name.trim().replace(['/', '\\'], "_")
}

impl ExportScope {
    /// Resolves the CSV file and image folder for this scope
    pub fn paths(&self, root: &Path, layout: OutputLayout, now: NaiveDateTime) -> ExportPaths {
        let date = date_stamp(now);

        match layout {
            OutputLayout::Folders => {
                let (folder, csv_name) = match self {
                    ExportScope::Product { title } => {
                        let slug = slugify(title);
                        (
                            root.join(format!("{}_details", slug)),
                            format!("{}_details_{}.csv", slug, date),
                        )
                    }
                    ExportScope::Catalogue { name } => (
                        root.join(folder_name(name)),
                        format!("{}_details_{}.csv", file_stem(name), date),
                    ),
                    ExportScope::Site { name } => (
                        root.to_path_buf(),
                        format!("{}_all_details_{}.csv", file_stem(name), date),
                    ),
                };
                ExportPaths {
                    csv_path: folder.join(csv_name),
                    image_dir: folder.join("images"),
                }
            }
            OutputLayout::Flat => {
                let csv_name = match self {
                    ExportScope::Product { title } => {
                        format!("{}_infos_{}.csv", file_stem(title), date)
                    }
                    ExportScope::Catalogue { name } => {
                        format!("{}_catalogue_infos_{}.csv", file_stem(name), date)
                    }
                    ExportScope::Site { name } => {
                        format!("{}_all_infos_{}.csv", file_stem(name), date)
                    }
                };
                ExportPaths {
                    csv_path: root.join(csv_name),
                    image_dir: root.join("images"),
                }
            }
        }
    }
}

/// Hands out image paths that collide neither with each other nor with files on disk
#[derive(Debug, Default)]
pub struct ImageNamer {
    taken: HashSet<PathBuf>,
}

impl ImageNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `<dir>/<slug>_<stamp>.jpg`, or `<slug>_<stamp>-N.jpg` if taken
    pub fn allocate(&mut self, dir: &Path, slug: &str, stamp: &str) -> PathBuf {
        let mut candidate = dir.join(format!("{}_{}.jpg", slug, stamp));
        let mut suffix = 2;
        while self.taken.contains(&candidate) || candidate.exists() {
            candidate = dir.join(format!("{}_{}-{}.jpg", slug, stamp, suffix));
            suffix += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}
