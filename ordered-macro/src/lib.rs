use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Error, Expr, ExprAssign, ExprLit, ExprPath, ExprUnary, FnArg, ImplItem, ItemImpl,
    Lit, ReturnType, Signature, Token, UnOp,
};

const TIME_UNITS: [&str; 4] = ["milliseconds", "seconds", "minutes", "hours"];

/// Collect the tagged methods of an inherent impl block into the callback catalog.
///
/// The type must implement `OrderedBehavior`. Inside the block, methods may carry any number
/// of `#[ordered_group(..)]` and `#[timed_callback(..)]` tags; every tag becomes its own
/// assignment.
///
/// # Example
///
/// ```rust,ignore
/// use ordered::{ordered, groups, OrderedBehavior};
///
/// struct Spawner;
///
/// impl OrderedBehavior for Spawner {}
///
/// #[ordered]
/// impl Spawner {
///     #[ordered_group(groups::FIRST_START, 0)]
///     fn initialize(&self) {}
///
///     #[ordered_group("late_update", priority = 10)]
///     #[ordered_group("cleanup")]
///     fn flush(&self) {}
///
///     #[timed_callback(2.0, 1.0)]
///     #[timed_callback(interval = "${app.heartbeat:500ms}")]
///     fn heartbeat(&self) {}
/// }
/// ```
///
/// # Tags
///
/// - `ordered_group(group, priority)`: `group` is a `&'static str` expression, `priority` an
///   `i32` expression (default `0`). Both may be given by name.
/// - `timed_callback(interval, start_delay)`: numbers, shorthand durations (`"500ms"`, `"2s"`)
///   or config placeholders (`"${app.key}"`, `"${app.key:default}"`). `start_delay` defaults
///   to `0`; `time_unit` (default seconds) applies to plain numbers.
///
/// Tagged methods must be `fn name(&self)`.
#[proc_macro_attribute]
pub fn ordered(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        let args = TokenStream2::from(args);
        return Error::new_spanned(args, "#[ordered] takes no arguments")
            .to_compile_error()
            .into();
    }

    let item_impl = syn::parse_macro_input!(input as ItemImpl);
    match expand_ordered(item_impl) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Group tag; only valid on a method inside an `#[ordered]` impl block.
#[proc_macro_attribute]
pub fn ordered_group(_args: TokenStream, input: TokenStream) -> TokenStream {
    misplaced_tag("ordered_group", input)
}

/// Timer tag; only valid on a method inside an `#[ordered]` impl block.
#[proc_macro_attribute]
pub fn timed_callback(_args: TokenStream, input: TokenStream) -> TokenStream {
    misplaced_tag("timed_callback", input)
}

fn misplaced_tag(tag: &str, input: TokenStream) -> TokenStream {
    let input = TokenStream2::from(input);
    let error = Error::new(
        Span::call_site(),
        format!("#[{}] must be used on a method inside an #[ordered] impl block", tag),
    )
    .to_compile_error();

    quote!(#error #input).into()
}

struct TaggedMethod {
    ident: syn::Ident,
    groups: Vec<TokenStream2>,
    timers: Vec<TokenStream2>,
}

fn expand_ordered(mut item_impl: ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(Error::new_spanned(
            path,
            "#[ordered] goes on an inherent impl block, not a trait impl",
        ));
    }
    if !item_impl.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item_impl.generics,
            "#[ordered] does not support generic impl blocks",
        ));
    }

    let mut tagged = Vec::new();
    for item in &mut item_impl.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };

        let (groups, timers) = take_tags(&mut method.attrs)?;
        if groups.is_empty() && timers.is_empty() {
            continue;
        }
        check_signature(&method.sig)?;

        tagged.push(TaggedMethod {
            ident: method.sig.ident.clone(),
            groups,
            timers,
        });
    }

    if tagged.is_empty() {
        return Ok(quote!(#item_impl));
    }

    let self_ty = &item_impl.self_ty;
    let count = tagged.len();
    let method_specs = tagged.iter().map(|method| {
        let ident = &method.ident;
        let name = ident.to_string();
        let groups = &method.groups;
        let timers = &method.timers;
        quote! {
            ::ordered::ordered_runtime::MethodSpec {
                name: #name,
                invoke: <#self_ty>::#ident,
                groups: &[#(#groups),*],
                timers: &[#(#timers),*],
            }
        }
    });

    Ok(quote! {
        #item_impl

        const _: () = {
            // Auto-registration using linkme
            #[::ordered::ordered_runtime::linkme::distributed_slice(::ordered::ordered_runtime::ORDERED_BEHAVIORS)]
            #[linkme(crate = ::ordered::ordered_runtime::linkme)]
            fn register() -> ::ordered::ordered_runtime::BehaviorRegistration {
                static METHODS: [::ordered::ordered_runtime::MethodSpec<#self_ty>; #count] = [
                    #(#method_specs),*
                ];
                ::ordered::ordered_runtime::BehaviorRegistration::of::<#self_ty>(
                    ::core::module_path!(),
                    &METHODS,
                )
            }
        };
    })
}

/// Strip the tags off `attrs`, returning the group and timer specs they declare.
fn take_tags(attrs: &mut Vec<Attribute>) -> syn::Result<(Vec<TokenStream2>, Vec<TokenStream2>)> {
    let mut groups = Vec::new();
    let mut timers = Vec::new();
    let mut kept = Vec::with_capacity(attrs.len());

    for attr in attrs.drain(..) {
        let tag = attr.path().segments.last().map(|s| s.ident.to_string());
        match tag.as_deref() {
            Some("ordered_group") => groups.push(parse_group(&attr)?),
            Some("timed_callback") => timers.push(parse_timer(&attr)?),
            _ => kept.push(attr),
        }
    }

    *attrs = kept;
    Ok((groups, timers))
}

/// Split tag arguments into positional values and `name = value` pairs.
fn tag_args(attr: &Attribute) -> syn::Result<(Vec<Expr>, Vec<(syn::Ident, Expr)>)> {
    let args = attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
    let mut positional = Vec::new();
    let mut named = Vec::new();

    for arg in args {
        match arg {
            Expr::Assign(ExprAssign { left, right, .. }) => {
                let Expr::Path(ExprPath { path, .. }) = left.as_ref() else {
                    return Err(Error::new_spanned(&left, "expected an argument name"));
                };
                let Some(name) = path.get_ident().cloned() else {
                    return Err(Error::new_spanned(path, "expected an argument name"));
                };
                named.push((name, *right));
            }
            other => {
                if !named.is_empty() {
                    return Err(Error::new_spanned(
                        other,
                        "positional arguments must come before named ones",
                    ));
                }
                positional.push(other);
            }
        }
    }
    Ok((positional, named))
}

/// Place positional then named arguments into the slots called `names`.
fn assign_slots(
    attr: &Attribute,
    names: &[&str],
    (positional, named): (Vec<Expr>, Vec<(syn::Ident, Expr)>),
) -> syn::Result<Vec<Option<Expr>>> {
    if positional.len() > names.len() {
        return Err(Error::new_spanned(
            attr,
            format!("expected at most {} arguments: {}", names.len(), names.join(", ")),
        ));
    }

    let mut slots: Vec<Option<Expr>> = vec![None; names.len()];
    for (slot, value) in slots.iter_mut().zip(positional) {
        *slot = Some(value);
    }

    for (name, value) in named {
        let Some(index) = names.iter().position(|candidate| name == candidate) else {
            return Err(Error::new_spanned(
                &name,
                format!("unknown argument `{}`, expected one of: {}", name, names.join(", ")),
            ));
        };
        if slots[index].is_some() {
            return Err(Error::new_spanned(&name, format!("`{}` given twice", name)));
        }
        slots[index] = Some(value);
    }
    Ok(slots)
}

fn parse_group(attr: &Attribute) -> syn::Result<TokenStream2> {
    let mut slots = assign_slots(attr, &["group", "priority"], tag_args(attr)?)?.into_iter();

    let group = slots
        .next()
        .flatten()
        .ok_or_else(|| Error::new_spanned(attr, "ordered_group needs a group id"))?;
    let priority = slots
        .next()
        .flatten()
        .map(|priority| quote!(#priority))
        .unwrap_or_else(|| quote!(0));

    Ok(quote! {
        ::ordered::ordered_runtime::GroupSpec::new(#group, #priority)
    })
}

fn parse_timer(attr: &Attribute) -> syn::Result<TokenStream2> {
    let mut slots = assign_slots(
        attr,
        &["interval", "start_delay", "time_unit"],
        tag_args(attr)?,
    )?
    .into_iter();

    let interval = slots
        .next()
        .flatten()
        .ok_or_else(|| Error::new_spanned(attr, "timed_callback needs an interval"))?;
    let interval = timer_value(&interval, "interval")?;
    let start_delay = match slots.next().flatten() {
        Some(expr) => timer_value(&expr, "start_delay")?,
        None => "0".to_string(),
    };
    let time_unit = match slots.next().flatten() {
        Some(expr) => time_unit_value(&expr)?,
        None => "seconds".to_string(),
    };

    Ok(quote! {
        ::ordered::ordered_runtime::TimerSpec {
            interval: #interval,
            start_delay: #start_delay,
            time_unit: #time_unit,
        }
    })
}

fn timer_value(expr: &Expr, what: &str) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Int(i), .. }) => Ok(i.base10_digits().to_string()),
        Expr::Lit(ExprLit { lit: Lit::Float(f), .. }) => Ok(f.base10_digits().to_string()),
        Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Ok(s.value()),
        Expr::Unary(ExprUnary { op: UnOp::Neg(_), .. }) => Err(Error::new_spanned(
            expr,
            format!("{} must not be negative", what),
        )),
        _ => Err(Error::new_spanned(
            expr,
            format!("{} must be a number or a string", what),
        )),
    }
}

fn time_unit_value(expr: &Expr) -> syn::Result<String> {
    let unit = match expr {
        Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => s.value(),
        // Support TimeUnit::Milliseconds, TimeUnit::Minutes, etc.
        Expr::Path(ExprPath { path, .. }) => match path.segments.last() {
            Some(segment) => segment.ident.to_string().to_lowercase(),
            None => return Err(Error::new_spanned(path, "invalid time_unit path")),
        },
        _ => {
            return Err(Error::new_spanned(
                expr,
                "time_unit must be a string or TimeUnit::* constant (e.g., TimeUnit::Milliseconds)",
            ))
        }
    };

    if unit.starts_with("${") || TIME_UNITS.contains(&unit.to_lowercase().as_str()) {
        Ok(unit)
    } else {
        Err(Error::new_spanned(
            expr,
            format!("unknown time_unit `{}`, expected one of: {}", unit, TIME_UNITS.join(", ")),
        ))
    }
}

fn check_signature(sig: &Signature) -> syn::Result<()> {
    if let Some(asyncness) = &sig.asyncness {
        return Err(Error::new_spanned(asyncness, "tagged methods cannot be async"));
    }
    if !sig.generics.params.is_empty() {
        return Err(Error::new_spanned(&sig.generics, "tagged methods cannot be generic"));
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some()
                && receiver.mutability.is_none()
                && receiver.colon_token.is_none() => {}
        _ => {
            return Err(Error::new_spanned(
                &sig.ident,
                "tagged methods must take `&self`",
            ))
        }
    }
    if let Some(extra) = inputs.next() {
        return Err(Error::new_spanned(
            extra,
            "tagged methods take no arguments besides `&self`",
        ));
    }
    if let ReturnType::Type(_, ty) = &sig.output {
        return Err(Error::new_spanned(ty, "tagged methods must return `()`"));
    }
    Ok(())
}
