//! # lingo-parser
//!
//! Parser and decoders for the Lingo literal notation used by level and
//! resource-definition files of a tile-based 2D world editor.
//!
//! File Layout
//!
//!     src/lingo
//!       ├── token, lexing     logos token set and span-carrying tokenization
//!       ├── parsing, ast      chumsky grammar producing the generic literal AST
//!       ├── decoding          pure AST-to-domain decoders (geometry, tiles, effects, ...)
//!       ├── init              line-oriented definition files and their schema tables
//!       ├── dex               registries built from decoded init records
//!       └── level             whole level file loading
//!
//!     The AST is the only intermediate representation between source text and domain
//!     structures. Decoders never look at text.

#![allow(rustdoc::invalid_html_tags)]

pub mod lingo;
