//! sheetmeta_engine - Cell addressing, formula references and dependency closure.

pub mod engine;
