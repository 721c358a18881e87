//! Filesystem access for notes: locating vaults, resolving names, reading and writing

pub mod reader;
pub mod resolver;
pub mod vault;
pub mod writer;

pub use reader::{Note, NoteReader, ReaderConfig};
pub use resolver::{add_md_suffix, is_markdown_file, NoteResolver, ResolverConfig};
pub use vault::{VaultLocator, CONFIG_HOME_ENV};
pub use writer::{
    generate_diff, BackupOptions, NoteWriter, OutputOptions, WriteOptions, WriteResult,
    WriterConfig,
};
