use super::{ArchiveEntry, EntryContent, EntryMode, Plan};
use crate::context::Context;
use crate::result::Result;
use std::fs::File;
use std::io;
use std::path::Path;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Owns the output file and the zip encoder for one build
pub struct ArchiveWriter {
    zip: ZipWriter<File>,
}

impl ArchiveWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            zip: ZipWriter::new(file),
        })
    }

    pub fn write_entry(&mut self, entry: &ArchiveEntry) -> Result<()> {
        let options = options(entry.mode);

        match &entry.content {
            EntryContent::Symlink(target) => {
                self.zip.add_symlink(entry.name.as_str(), target.as_str(), options)?;
            }
            EntryContent::Directory => {
                self.zip.add_directory(entry.name.as_str(), options)?;
            }
            EntryContent::File(source) => {
                let mut f = File::open(source)?;
                self.zip.start_file(entry.name.as_str(), options)?;
                io::copy(&mut f, &mut self.zip)?;
            }
        }

        Ok(())
    }

    /// Write the central directory and close the file.
    ///
    /// A failure to sync the closed file is reported as a warning only.
    pub fn finish(self) -> Result<()> {
        let file = self.zip.finish()?;
        if let Err(e) = file.sync_all() {
            cliclack::log::warning(format!("Failed to close zip file: {}", e))?;
        }
        Ok(())
    }

    /// Best-effort close after a failed entry; the archive is left on disk.
    fn abandon(self) {
        if let Err(e) = self.finish() {
            let _ = cliclack::log::warning(format!("Failed to close zip file: {}", e));
        }
    }
}

fn options(mode: EntryMode) -> SimpleFileOptions {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    match mode.unix_permissions() {
        Some(permissions) => options.unix_permissions(permissions),
        None => options,
    }
}

/// Write every planned entry, in order, to a new archive at `output`
pub fn write(ctx: &Context, plan: &Plan, output: &Path) -> Result<()> {
    let mut writer = ArchiveWriter::create(output)?;

    let written = plan.entries().iter().try_for_each(|entry| -> Result<()> {
        if ctx.verbose {
            cliclack::log::step(format!("adding {}", entry))?;
        }
        writer.write_entry(entry)
    });

    match written {
        Ok(()) => writer.finish(),
        Err(e) => {
            writer.abandon();
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{self, BOOTSTRAP};
    use crate::context::DirLayout;
    use crate::request::PackageRequest;
    use std::fs;
    use std::io::Read;
    use std::path::PathBuf;
    use zip::ZipArchive;

    const S_IFMT: u32 = 0o170000;
    const S_IFLNK: u32 = 0o120000;

    fn ctx() -> Context {
        Context {
            verbose: false,
            layout: DirLayout::Flatten,
            dry_run: false,
        }
    }

    fn open(path: &Path) -> ZipArchive<File> {
        ZipArchive::new(File::open(path).unwrap()).unwrap()
    }

    fn names(zip: &mut ZipArchive<File>) -> Vec<String> {
        (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect()
    }

    fn read(zip: &mut ZipArchive<File>, name: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        zip.by_name(name).unwrap().read_to_end(&mut buf).unwrap();
        buf
    }

    fn mode(zip: &mut ZipArchive<File>, name: &str) -> u32 {
        zip.by_name(name).unwrap().unix_mode().unwrap()
    }

    #[test]
    fn test_executable_with_bootstrap_link() {
        let tmp = tempfile::tempdir().unwrap();
        let exe = tmp.path().join("main");
        let bytes: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        fs::write(&exe, &bytes).unwrap();
        let output = tmp.path().join("main.zip");

        let request = PackageRequest {
            executable: Some(exe),
            supplemental: vec![],
            output: output.clone(),
        };
        archive::build(&ctx(), &request).unwrap();

        let mut zip = open(&output);
        assert_eq!(names(&mut zip), vec![BOOTSTRAP, "main"]);

        let link_mode = mode(&mut zip, BOOTSTRAP);
        assert_eq!(link_mode & S_IFMT, S_IFLNK);
        assert_eq!(link_mode & 0o777, 0o755);
        assert_eq!(read(&mut zip, BOOTSTRAP), b"main");

        assert_eq!(mode(&mut zip, "main") & 0o777, 0o777);
        assert_eq!(zip.by_name("main").unwrap().compression(), CompressionMethod::Deflated);
        assert_eq!(read(&mut zip, "main"), bytes);
    }

    #[test]
    fn test_directory_entries_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("public");
        fs::create_dir_all(root.join("img")).unwrap();
        fs::write(root.join("img").join("logo.svg"), "<svg/>").unwrap();
        fs::write(root.join("robots.txt"), "User-agent: *").unwrap();
        let output = tmp.path().join("public.zip");

        let request = PackageRequest {
            executable: None,
            supplemental: vec![root],
            output: output.clone(),
        };
        archive::build(&ctx(), &request).unwrap();

        let mut zip = open(&output);
        assert_eq!(names(&mut zip), vec!["img/", "logo.svg", "robots.txt"]);
        assert!(zip.by_name("img/").unwrap().is_dir());
        assert_eq!(read(&mut zip, "logo.svg"), b"<svg/>");
        assert_eq!(read(&mut zip, "robots.txt"), b"User-agent: *");
        assert_ne!(mode(&mut zip, "robots.txt") & 0o777, 0o777);
    }

    #[test]
    fn test_missing_file_aborts_and_leaves_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let exe = tmp.path().join("app");
        fs::write(&exe, "binary").unwrap();
        let output = tmp.path().join("app.zip");

        let request = PackageRequest {
            executable: Some(exe),
            supplemental: vec![tmp.path().join("missing.yaml")],
            output: output.clone(),
        };
        let err = archive::build(&ctx(), &request).unwrap_err();

        assert!(matches!(err, crate::error::Error::Io(_)));
        assert!(output.exists());
    }

    #[test]
    fn test_unwritable_output_fails_before_reading() {
        let tmp = tempfile::tempdir().unwrap();
        let output: PathBuf = tmp.path().join("no-such-dir").join("out.zip");
        let plan = Plan::new();

        assert!(write(&ctx(), &plan, &output).is_err());
    }
}
