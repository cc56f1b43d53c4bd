use std::path::{Path, PathBuf};

/// File type filter offered by the image chooser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

pub const AUCTION_IMAGE_FILTER: ImageFilter = ImageFilter {
    name: "Open Image File",
    extensions: &["png", "jpg"],
};

impl ImageFilter {
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

/// Modal dialogs the auction view opens. Each call blocks until the user
/// answers and holds no state afterwards.
pub trait ViewDialogs {
    fn confirm(&mut self, title: &str, header: &str) -> bool;

    fn pick_image(&mut self, filter: &ImageFilter) -> Option<PathBuf>;
}

pub struct RfdDialogs;

impl ViewDialogs for RfdDialogs {
    fn confirm(&mut self, title: &str, header: &str) -> bool {
        let result = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Info)
            .set_title(title)
            .set_description(header)
            .set_buttons(rfd::MessageButtons::OkCancel)
            .show();
        matches!(result, rfd::MessageDialogResult::Ok)
    }

    fn pick_image(&mut self, filter: &ImageFilter) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().add_filter(filter.name, filter.extensions);
        if let Some(dir) = dirs::picture_dir() {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_file()
    }
}
