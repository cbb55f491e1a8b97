use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Expr, LitStr};

/// Template literal macro
///
/// Splits a string literal on `{expr}` interpolations and expands to a call
/// of `jsx_template::jsx` with the literal fragments and the interpolated
/// values. Write `{{` and `}}` for literal braces.
///
/// # Examples
///
/// ```ignore
/// use jsx_template::{jsx, Callback};
///
/// let on_click = Callback::new(|_| {});
/// let template = jsx!("<a id=\"link\" onClick={on_click}>Click Me</a>");
/// ```
#[proc_macro]
pub fn jsx(input: TokenStream) -> TokenStream {
    let literal = parse_macro_input!(input as LitStr);

    match generate_invocation(&literal) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_invocation(literal: &LitStr) -> syn::Result<TokenStream2> {
    let source = literal.value();
    let (fragments, expressions) =
        split_template(&source).map_err(|message| syn::Error::new(literal.span(), message))?;

    let values = expressions
        .iter()
        .map(|expr| {
            syn::parse_str::<Expr>(expr).map_err(|err| {
                syn::Error::new(
                    literal.span(),
                    format!("invalid interpolation `{{{}}}`: {}", expr, err),
                )
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        ::jsx_template::jsx(
            &[#(#fragments),*],
            &[#(::jsx_template::Value::from(#values)),*],
        )
    })
}

/// Split template source into literal fragments and expression sources
///
/// Always yields one more fragment than expressions.
fn split_template(source: &str) -> Result<(Vec<String>, Vec<String>), String> {
    let mut fragments = Vec::new();
    let mut expressions = Vec::new();
    let mut current = String::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                current.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                current.push('}');
            }
            '}' => return Err("unmatched `}` in template; write `}}` for a literal brace".into()),
            '{' => {
                let expr = read_expression(&mut chars)?;
                if expr.trim().is_empty() {
                    return Err("empty interpolation `{}` in template".into());
                }
                fragments.push(std::mem::take(&mut current));
                expressions.push(expr);
            }
            _ => current.push(c),
        }
    }
    fragments.push(current);

    Ok((fragments, expressions))
}

fn read_expression(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<String, String> {
    let mut expr = String::new();
    let mut depth = 0usize;
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            expr.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        expr.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                expr.push(c);
            }
            '{' => {
                depth += 1;
                expr.push(c);
            }
            '}' if depth == 0 => return Ok(expr),
            '}' => {
                depth -= 1;
                expr.push(c);
            }
            _ => expr.push(c),
        }
    }

    Err("unterminated interpolation in template; missing `}`".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain() {
        let (fragments, exprs) = split_template("<div>Test</div>").unwrap();
        assert_eq!(fragments, vec!["<div>Test</div>"]);
        assert!(exprs.is_empty());
    }

    #[test]
    fn test_split_interpolations() {
        let (fragments, exprs) =
            split_template("<a onClick={on_click}>{label}</a>").unwrap();
        assert_eq!(fragments, vec!["<a onClick=", ">", "</a>"]);
        assert_eq!(exprs, vec!["on_click", "label"]);
    }

    #[test]
    fn test_split_nested_braces_and_strings() {
        let (fragments, exprs) =
            split_template("<p>{ { let x = \"}\"; x } }</p>").unwrap();
        assert_eq!(fragments, vec!["<p>", "</p>"]);
        assert_eq!(exprs, vec![" { let x = \"}\"; x } "]);
    }

    #[test]
    fn test_split_escaped_braces() {
        let (fragments, exprs) = split_template("<style>a {{ color: red }}</style>").unwrap();
        assert_eq!(fragments, vec!["<style>a { color: red }</style>"]);
        assert!(exprs.is_empty());
    }

    #[test]
    fn test_split_errors() {
        assert!(split_template("<p>{value</p>").is_err());
        assert!(split_template("<p>}</p>").is_err());
        assert!(split_template("<p>{ }</p>").is_err());
    }
}
