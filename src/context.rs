/// How files discovered inside an input directory are named in the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirLayout {
    /// Base name only; same-named files from different subdirectories collide
    #[default]
    Flatten,
    /// Path relative to the input directory, joined with `/`
    Preserve,
}

/// Context passed throughout the application containing global configuration
#[derive(Clone)]
pub struct Context {
    /// Enable verbose output (log each archive entry)
    pub verbose: bool,

    /// Naming of entries produced by directory recursion
    pub layout: DirLayout,

    /// Plan only, never create the output file
    pub dry_run: bool,
}

impl Context {
    pub fn new(verbose: bool, preserve_paths: bool, dry_run: bool) -> Self {
        let layout = if preserve_paths {
            DirLayout::Preserve
        } else {
            DirLayout::Flatten
        };

        Self {
            verbose,
            layout,
            dry_run,
        }
    }
}
