//! Accessor generation macros
//!
//! Node types wrap a plain payload record; these macros generate the
//! per-field get/set/with methods on the wrapper and the `is_*`/`as_*`
//! helpers on [`DocNode`](crate::nodes::DocNode). All macros use `paste`
//! internally for identifier concatenation.

// =============================================================================
// Payload accessors
// =============================================================================

/// Generate get/set/with methods for fields of a node's payload record
///
/// Fields are grouped by how the getter hands out the value:
/// - `str { a, b }` - `String` fields, getter returns `&str`, setters take `impl Into<String>`
/// - `copy { a: T }` - `Copy` fields, getter returns `T`
/// - `ref { a: T }` - other fields, getter returns `&T`, plus `a_mut(&mut self) -> &mut T`
///
/// # Generated methods per field
/// - `field(&self)` - getter
/// - `set_field(&mut self, value)` - mutates this node's own copy
/// - `with_field(self, value) -> Self` - builder style
///
/// # Example
/// ```ignore
/// impl_payload_accessors!(ImageNode, payload;
///     str { src, caption },
///     copy { width: Option<u32> },
/// );
/// ```
#[macro_export]
macro_rules! impl_payload_accessors {
    (
        $node:ty, $payload:ident;
        $(str { $($s:ident),* $(,)? } $(,)?)?
        $(copy { $($c:ident: $cty:ty),* $(,)? } $(,)?)?
        $(ref { $($r:ident: $rty:ty),* $(,)? } $(,)?)?
    ) => {
        ::paste::paste! {
            impl $node {
                $($(
                    #[doc = "Get `" $s "`"]
                    pub fn $s(&self) -> &str {
                        &self.$payload.$s
                    }

                    #[doc = "Set `" $s "`"]
                    pub fn [<set_ $s>](&mut self, value: impl Into<String>) {
                        self.$payload.$s = value.into();
                    }

                    #[doc = "Return a copy with `" $s "` replaced"]
                    pub fn [<with_ $s>](mut self, value: impl Into<String>) -> Self {
                        self.$payload.$s = value.into();
                        self
                    }
                )*)?

                $($(
                    #[doc = "Get `" $c "`"]
                    pub fn $c(&self) -> $cty {
                        self.$payload.$c
                    }

                    #[doc = "Set `" $c "`"]
                    pub fn [<set_ $c>](&mut self, value: $cty) {
                        self.$payload.$c = value;
                    }

                    #[doc = "Return a copy with `" $c "` replaced"]
                    pub fn [<with_ $c>](mut self, value: $cty) -> Self {
                        self.$payload.$c = value;
                        self
                    }
                )*)?

                $($(
                    #[doc = "Get `" $r "`"]
                    pub fn $r(&self) -> &$rty {
                        &self.$payload.$r
                    }

                    #[doc = "Get mutable `" $r "`"]
                    pub fn [<$r _mut>](&mut self) -> &mut $rty {
                        &mut self.$payload.$r
                    }

                    #[doc = "Set `" $r "`"]
                    pub fn [<set_ $r>](&mut self, value: $rty) {
                        self.$payload.$r = value;
                    }

                    #[doc = "Return a copy with `" $r "` replaced"]
                    pub fn [<with_ $r>](mut self, value: $rty) -> Self {
                        self.$payload.$r = value;
                        self
                    }
                )*)?
            }
        }
    };
}

// =============================================================================
// DocNode accessors
// =============================================================================

/// Generate is_xxx, as_xxx, as_xxx_mut for `DocNode` variants
///
/// Uses paste's `:camel` modifier to derive the variant name and the
/// `<Variant>Node` payload type from the method name.
///
/// # Example
/// ```ignore
/// impl DocNode {
///     // paragraph -> Paragraph(ParagraphNode), list_item -> ListItem(ListItemNode)
///     impl_doc_node_accessors!(paragraph, list_item);
/// }
/// ```
#[macro_export]
macro_rules! impl_doc_node_accessors {
    ($($variant:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Check if this is a " [<$variant:camel>] " node"]
                pub fn [<is_ $variant>](&self) -> bool {
                    matches!(self, Self::[<$variant:camel>](_))
                }

                #[doc = "Try to get as " $variant " reference"]
                pub fn [<as_ $variant>](&self) -> Option<&[<$variant:camel Node>]> {
                    match self { Self::[<$variant:camel>](v) => Some(v), _ => None }
                }

                #[doc = "Try to get as mutable " $variant " reference"]
                pub fn [<as_ $variant _mut>](&mut self) -> Option<&mut [<$variant:camel Node>]> {
                    match self { Self::[<$variant:camel>](v) => Some(v), _ => None }
                }
            )*
        }
    };
}
