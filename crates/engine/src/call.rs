// Call-expression parser - converts model output into a single call form
// Supports: name(arg, "string", 'string', 42, -3.5)
// Deliberately rejects: nesting, operators, anything beyond one call

/// One positional argument of a call expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Bare identifier (column name, enum value, true/false).
    Ident(String),
    /// Quoted string literal.
    Text(String),
    Number(f64),
}

/// The parsed call: one operation name, flat argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub name: String,
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    StringLit(String),
    Number(f64),
    LParen,
    RParen,
    Comma,
}

/// Parse model output as a call expression. Leading/trailing whitespace and
/// one trailing period are tolerated; everything else must match the
/// grammar exactly.
pub fn parse(input: &str) -> Result<CallExpr, String> {
    let input = input.trim().trim_end_matches('.').trim();
    if input.is_empty() {
        return Err("empty call expression".to_string());
    }

    let tokens = tokenize(input)?;
    parse_call(&tokens)
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            ',' => {
                tokens.push(Token::Comma);
                chars.next();
            }
            '"' | '\'' => {
                let quote = c;
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some(ch) if ch == quote => break,
                        Some(ch) => s.push(ch),
                        None => return Err("unterminated string literal".to_string()),
                    }
                }
                tokens.push(Token::StringLit(s));
            }
            '0'..='9' | '-' | '+' => {
                let mut num_str = String::new();
                if c == '-' || c == '+' {
                    num_str.push(c);
                    chars.next();
                }
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num_str.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| format!("invalid number: {num_str}"))?;
                tokens.push(Token::Number(num));
            }
            'A'..='Z' | 'a'..='z' | '_' => {
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            _ => return Err(format!("unexpected character: {c}")),
        }
    }

    Ok(tokens)
}

fn parse_call(tokens: &[Token]) -> Result<CallExpr, String> {
    let mut pos = 0;

    let name = match tokens.get(pos) {
        Some(Token::Ident(name)) => name.clone(),
        _ => return Err("expected an operation name".to_string()),
    };
    pos += 1;

    match tokens.get(pos) {
        Some(Token::LParen) => pos += 1,
        _ => return Err(format!("expected '(' after '{name}'")),
    }

    let mut args = Vec::new();
    if tokens.get(pos) == Some(&Token::RParen) {
        pos += 1;
    } else {
        loop {
            let arg = match tokens.get(pos) {
                Some(Token::Ident(s)) => {
                    // An identifier followed by '(' would be a nested call
                    if tokens.get(pos + 1) == Some(&Token::LParen) {
                        return Err(format!("nested call '{s}(...)' is not allowed"));
                    }
                    Arg::Ident(s.clone())
                }
                Some(Token::StringLit(s)) => Arg::Text(s.clone()),
                Some(Token::Number(n)) => Arg::Number(*n),
                _ => return Err("expected an argument".to_string()),
            };
            args.push(arg);
            pos += 1;

            match tokens.get(pos) {
                Some(Token::Comma) => pos += 1,
                Some(Token::RParen) => {
                    pos += 1;
                    break;
                }
                _ => return Err("expected ',' or ')' in argument list".to_string()),
            }
        }
    }

    if pos != tokens.len() {
        return Err("unexpected text after call expression".to_string());
    }

    Ok(CallExpr { name, args })
}
