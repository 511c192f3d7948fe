//! quillc-gen - Code Generator
//!
//! The last phase of the Quill pipeline: typed IR in, Java-flavored text
//! out. The output is not a general pretty-printer; it is a fixed lowering
//! schema mirroring the IR shape, meant to be handed to a host Java
//! compiler by the surrounding harness:
//!
//! - the program becomes a `public static class Main` whose leading
//!   `LET`/`DEF` statements hoist to static members, with everything from
//!   the first non-declaration statement on inside a synthesized `main`;
//! - arbitrary-precision arithmetic lowers to `BigInteger`/`BigDecimal`
//!   method calls, ordering to `compareTo(...) OP 0`, equality to
//!   `Objects.equals`, and `AND`/`OR` to the host's short-circuit
//!   operators;
//! - object literals lower to anonymous `new Object() { ... }` bodies.
//!
//! Generation never fails on well-formed IR; an impossible shape (an
//! operator the analyzer never produces, for instance) is an internal
//! invariant violation and panics.

pub mod java;

pub use java::generate;
