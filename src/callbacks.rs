//! The callback table the parser drives.
//!
//! Modeled as a record of `Option<fn(...)>` rather than a trait with
//! default methods: a mode harness builds one of these as plain data (see
//! [`crate::modes`]), so "usertext skips images" is just "the `image`
//! field is `None`" rather than a different trait impl. A `None` inline
//! callback means emit the source text verbatim; a `None` block callback
//! means omit the construct entirely.
//!
//! Every callback's mutable, per-render state (TOC counters, render flags,
//! whitelist tables, link-attribute options) travels as the explicit
//! `&mut RenderState` parameter — the direct analogue of the C renderer's
//! `void *opaque` pointer, made concrete instead of type-erased.

use crate::autolink::AutolinkKind;
use crate::buffer::Buffer;
use crate::render::RenderState;

pub type BlockCodeFn = fn(&mut Buffer, Option<&[u8]>, Option<&[u8]>, &mut RenderState);
pub type BlockTextFn = fn(&mut Buffer, Option<&[u8]>, &mut RenderState);
pub type HeaderFn = fn(&mut Buffer, Option<&[u8]>, u32, &mut RenderState);
pub type HruleFn = fn(&mut Buffer, &mut RenderState);
pub type ListFn = fn(&mut Buffer, Option<&[u8]>, bool, &mut RenderState);
pub type TableFn = fn(&mut Buffer, Option<&[u8]>, Option<&[u8]>, &mut RenderState);
pub type TableCellFn = fn(&mut Buffer, Option<&[u8]>, bool, Align, u32, &mut RenderState);

pub type AutolinkFn = fn(&mut Buffer, &[u8], AutolinkKind, &mut RenderState) -> bool;
pub type InlineTextFn = fn(&mut Buffer, &[u8], &mut RenderState) -> bool;
pub type LineBreakFn = fn(&mut Buffer, &mut RenderState) -> bool;
pub type LinkFn = fn(&mut Buffer, Option<&[u8]>, Option<&[u8]>, &[u8], &mut RenderState) -> bool;
pub type ImageFn = fn(&mut Buffer, &[u8], Option<&[u8]>, &[u8], &mut RenderState) -> bool;

pub type EntityFn = fn(&mut Buffer, &[u8], &mut RenderState);
pub type NormalTextFn = fn(&mut Buffer, &[u8], &mut RenderState);

pub type DocumentFn = fn(&mut Buffer, &mut RenderState);
pub type LinkAttributesFn = fn(&mut Buffer, &[u8], &RenderState);

/// Table cell alignment, carried from the table construct to `tablecell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    None,
    Left,
    Right,
    Center,
}

/// Record of optional callbacks. A `None` field means: for a block
/// callback, omit the construct entirely; for an inline callback, emit the
/// source text verbatim instead of calling it.
#[derive(Default)]
pub struct Callbacks {
    // Block.
    pub block_code: Option<BlockCodeFn>,
    pub block_quote: Option<BlockTextFn>,
    pub block_spoiler: Option<BlockTextFn>,
    pub raw_block: Option<BlockTextFn>,
    pub header: Option<HeaderFn>,
    pub hrule: Option<HruleFn>,
    pub list: Option<ListFn>,
    pub list_item: Option<BlockTextFn>,
    pub paragraph: Option<BlockTextFn>,
    pub table: Option<TableFn>,
    pub table_row: Option<BlockTextFn>,
    pub table_cell: Option<TableCellFn>,

    // Inline.
    pub autolink: Option<AutolinkFn>,
    pub codespan: Option<InlineTextFn>,
    pub spoiler_span: Option<InlineTextFn>,
    pub double_emphasis: Option<InlineTextFn>,
    pub emphasis: Option<InlineTextFn>,
    pub image: Option<ImageFn>,
    pub line_break: Option<LineBreakFn>,
    pub link: Option<LinkFn>,
    pub raw_html_inline: Option<InlineTextFn>,
    pub triple_emphasis: Option<InlineTextFn>,
    pub strikethrough: Option<InlineTextFn>,
    pub superscript: Option<InlineTextFn>,

    // Low-level.
    pub entity: Option<EntityFn>,
    pub normal_text: Option<NormalTextFn>,

    // Document lifecycle.
    pub pre_document: Option<DocumentFn>,
    pub post_document: Option<DocumentFn>,
}
