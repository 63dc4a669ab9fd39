/// Derives an [`Enumeration`](crate::determinant::Enumeration) implementation
/// for a fieldless enum.
/// This macro does not modify the input.
///
/// The generated implementation lists all variants in declaration order
/// and reports the declared discriminant of each variant as its ordinal.
/// Structs, unions and enums with fields are rejected at compile time,
/// as are enums with `#[repr(u128)]`, whose discriminants do not fit in the `i128` ordinal.
///
/// # Options
/// Options are applied in the form `#[fixmap(...)]`.
///
/// ## `fixmap_as($path)`
/// Refers to the `fixmap` crate through `$path` instead of `::fixmap`.
///
/// # Example
/// ```
/// use fixmap::Enumeration;
///
/// #[derive(Clone, Copy, Enumeration)]
/// #[repr(u8)]
/// enum Color {
///     Red = 2,
///     Green = 4,
///     Blue,
/// }
///
/// assert_eq!(Color::VARIANTS.len(), 3);
/// assert_eq!(Color::Blue.ordinal(), 5);
/// ```
///
/// ```compile_fail
/// #[derive(Clone, Copy, fixmap::Enumeration)]
/// #[repr(u128)]
/// enum Huge {
///     Low = 0,
///     High = u128::MAX,
/// }
/// ```
#[doc(inline)]
pub use fixmap_codegen::Enumeration;
