//! Testing infrastructure for metaclassify.
//!
//! Real translation units come from libclang, which is not available in
//! unit tests. [`TuBuilder`] assembles the same cursor/type arena the
//! frontend would dump, so tests can describe declarations directly:
//!
//! ```rust
//! use metaclassify::frontend::TypeKind;
//! use metaclassify::testkit::TuBuilder;
//!
//! let mut b = TuBuilder::new();
//! let ns = b.namespace(b.root(), "app");
//! let point = b.class(ns, "Point");
//! let int = b.primitive(TypeKind::Int, "int");
//! let x = b.field(point, "x", int);
//! b.init_value(x, "0");
//! let tu = b.build();
//! assert_eq!(tu.cursor(point).spelling, "Point");
//! ```

mod builder;

pub use builder::TuBuilder;
