use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Nothing, Parser},
    parse_macro_input, Block, Expr, ExprBlock, Field, Fields, ItemStruct, Stmt,
};

extern crate proc_macro;

#[proc_macro_derive(Event)]
pub fn event(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    let name = &input.ident;

    quote! {
        impl crate::plugin::Event for #name {
            fn get_name_static() -> &'static str {
                stringify!(#name)
            }

            fn get_name(&self) -> &'static str {
                stringify!(#name)
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    }
    .into()
}

#[proc_macro_attribute]
pub fn cancellable(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_struct = parse_macro_input!(input as ItemStruct);
    let name = item_struct.ident.clone();
    let _ = parse_macro_input!(args as Nothing);

    if let Fields::Named(ref mut fields) = item_struct.fields {
        let field = Field::parse_named.parse2(quote! {
            /// Whether a handler cancelled the event.
            pub cancelled: bool
        });
        match field {
            Ok(field) => fields.named.push(field),
            Err(err) => return err.to_compile_error().into(),
        }
    } else {
        return syn::Error::new_spanned(&item_struct, "cancellable events need named fields")
            .to_compile_error()
            .into();
    }

    quote! {
        #item_struct

        impl crate::plugin::Cancellable for #name {
            fn cancelled(&self) -> bool {
                self.cancelled
            }

            fn set_cancelled(&mut self, cancelled: bool) {
                self.cancelled = cancelled;
            }
        }
    }
    .into()
}

/// Fires a cancellable event through a server's plugin manager.
///
/// ```ignore
/// send_cancellable! {{
///     server;
///     ChunkUnload::new(world, chunk, save);
///
///     'after: {
///         // runs when no handler cancelled, `event` is in scope
///     }
///
///     'cancelled: {
///         // runs otherwise
///     }
/// }}
/// ```
#[proc_macro]
pub fn send_cancellable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as Block);

    let mut exprs: Vec<Expr> = Vec::new();
    let mut after_block: Option<ExprBlock> = None;
    let mut cancelled_block: Option<ExprBlock> = None;

    for stmt in input.stmts {
        let Stmt::Expr(expr, _) = stmt else {
            continue;
        };
        match expr {
            Expr::Block(mut block) if block.label.is_some() => {
                // The labels only name the branches, they are not spliced in
                let Some(label) = block.label.take() else {
                    continue;
                };
                match label.name.ident.to_string().as_str() {
                    "after" => after_block = Some(block),
                    "cancelled" => cancelled_block = Some(block),
                    _ => {
                        return syn::Error::new_spanned(label, "expected 'after or 'cancelled")
                            .to_compile_error()
                            .into()
                    }
                }
            }
            expr => exprs.push(expr),
        }
    }

    let (Some(server), Some(event)) = (exprs.first(), exprs.get(1)) else {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "a server and an event must be specified",
        )
        .to_compile_error()
        .into();
    };

    let fire = quote! {
        let event = #server.plugin_manager.fire(&#server, #event).await;
    };

    match (after_block, cancelled_block) {
        (Some(after_block), Some(cancelled_block)) => quote! {
            #fire

            if !event.cancelled {
                #after_block
            } else {
                #cancelled_block
            }
        },
        (Some(after_block), None) => quote! {
            #fire

            if !event.cancelled {
                #after_block
            }
        },
        (None, Some(cancelled_block)) => quote! {
            #fire

            if event.cancelled {
                #cancelled_block
            }
        },
        (None, None) => fire,
    }
    .into()
}
