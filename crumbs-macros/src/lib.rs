use proc_macro::TokenStream;

mod wire;

/// Generates the implementation block for conforming to `WireIter`.
///
/// Fields are written in declaration order with no padding.
///
/// # Note
///
/// Requires `crumbs_wire` to be in scope with that name.
#[proc_macro_derive(WireIter)]
pub fn wire_iter(item: TokenStream) -> TokenStream {
    wire::wire_iter(item)
}

/// Generates the implementation block for conforming to `WireBuf`.
///
/// As of now, generic types *cannot* implement `WireBuf` on stable.
///
/// # Note
///
/// Requires `crumbs_wire` to be in scope with that name.
#[proc_macro_derive(WireBuf)]
pub fn wire_buf(item: TokenStream) -> TokenStream {
    wire::wire_buf(item)
}
