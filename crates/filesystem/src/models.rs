/// Local file access used when building upload batches.
pub struct FileSystem;
