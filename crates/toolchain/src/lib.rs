//! External tools behind small capability traits.
//!
//! The conversion engine never spawns processes itself. It talks to a
//! [`Decompiler`] and a [`Compiler`]; the implementations here shell out to an
//! `uncompyle6`-compatible executable and to a Python interpreter's
//! `py_compile` module through a shared [`Runner`], which owns the optional
//! per-invocation timeout.

mod decompiler;
pub mod error;
mod python;
mod runner;

pub use crate::decompiler::{Decompiler, Uncompyle};
pub use crate::python::{Compiler, Python, PythonVersion};
pub use crate::runner::{Captured, Runner};
