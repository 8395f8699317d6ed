/// Significant-figure bookkeeping and number formatting.
///
/// Houses the digit-counting rules used by the literal scanner and the
/// arithmetic engine, the display-rounding strategy, and the Unicode
/// superscript/subscript renderers used by quantity and formula printing.
pub mod digits;
