use crate::{
    ast::{
        ast::{BinaryOp, Expr, UnaryOp},
        expressions::{
            ArrayExpr, BinaryExpr, BoolExpr, CallExpr, ConditionalExpr, FloatExpr, IdentExpr,
            IntExpr, MemberExpr, StringExpr, SubscriptExpr, UnaryExpr,
        },
    },
    errors::errors::{Error, ErrorKind},
    lexer::tokens::{Token, TokenKind},
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorKind::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.current_token().span,
        ));
    };

    let mut left = nud_fn(parser)?;

    // While the current token binds tighter than bp, keep extending lhs.
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        // Statements juxtapose without terminators, so a token with no
        // infix role ends the expression instead of erroring.
        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            break;
        };

        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.advance().clone();
            parse_number(&token)
        }
        TokenKind::Identifier => {
            let token = parser.advance().clone();
            Ok(Expr::Ident(IdentExpr {
                name: token.value,
                span: token.span,
            }))
        }
        TokenKind::String => {
            let token = parser.advance().clone();
            Ok(Expr::Str(StringExpr {
                value: token.value,
                span: token.span,
            }))
        }
        // `idol` in expression position is the boolean true literal.
        TokenKind::Idol | TokenKind::True => {
            let token = parser.advance().clone();
            Ok(Expr::Bool(BoolExpr {
                value: true,
                span: token.span,
            }))
        }
        TokenKind::False => {
            let token = parser.advance().clone();
            Ok(Expr::Bool(BoolExpr {
                value: false,
                span: token.span,
            }))
        }
        _ => Err(Error::new(
            ErrorKind::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.current_token().span,
        )),
    }
}

fn parse_number(token: &Token) -> Result<Expr, Error> {
    if token.value.contains('.') {
        match token.value.parse::<f64>() {
            Ok(value) => Ok(Expr::Float(FloatExpr {
                value,
                span: token.span,
            })),
            Err(_) => Err(Error::new(
                ErrorKind::NumberParseError {
                    token: token.value.clone(),
                },
                token.span,
            )),
        }
    } else {
        match token.value.parse::<i64>() {
            Ok(value) => Ok(Expr::Int(IntExpr {
                value,
                span: token.span,
            })),
            Err(_) => Err(Error::new(
                ErrorKind::NumberParseError {
                    token: token.value.clone(),
                },
                token.span,
            )),
        }
    }
}

fn binary_op(token: &Token) -> Result<BinaryOp, Error> {
    match token.kind {
        TokenKind::Or => Ok(BinaryOp::Or),
        TokenKind::And => Ok(BinaryOp::And),
        TokenKind::Less => Ok(BinaryOp::Less),
        TokenKind::LessEquals => Ok(BinaryOp::LessEq),
        TokenKind::Greater => Ok(BinaryOp::Greater),
        TokenKind::GreaterEquals => Ok(BinaryOp::GreaterEq),
        TokenKind::Equals => Ok(BinaryOp::Eq),
        TokenKind::NotEquals => Ok(BinaryOp::NotEq),
        TokenKind::Plus => Ok(BinaryOp::Add),
        TokenKind::Dash => Ok(BinaryOp::Sub),
        TokenKind::Star => Ok(BinaryOp::Mul),
        TokenKind::Slash => Ok(BinaryOp::Div),
        TokenKind::Percent => Ok(BinaryOp::Mod),
        TokenKind::StarStar => Ok(BinaryOp::Pow),
        _ => Err(Error::new(
            ErrorKind::UnexpectedToken {
                token: token.value.clone(),
            },
            token.span,
        )),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = binary_op(&operator_token)?;

    // `**` nests to the right, everything else to the left.
    let rhs_bp = if op == BinaryOp::Pow {
        BindingPower::Multiplicative
    } else {
        bp
    };
    let right = parse_expr(parser, rhs_bp)?;

    let span = left.span().to(right.span());
    Ok(Expr::Binary(BinaryExpr {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = match operator_token.kind {
        TokenKind::Dash => UnaryOp::Neg,
        TokenKind::Not => UnaryOp::Not,
        _ => {
            return Err(Error::new(
                ErrorKind::UnexpectedToken {
                    token: operator_token.value.clone(),
                },
                operator_token.span,
            ))
        }
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;

    // `-a ** b` is ambiguous and rejected; the writer must pick
    // `(-a) ** b` or `-(a ** b)` with parentheses.
    if op == UnaryOp::Neg && parser.current_token_kind() == TokenKind::StarStar {
        return Err(Error::new(
            ErrorKind::UnexpectedTokenDetailed {
                token: String::from("**"),
                message: String::from("a negation may not be exponentiated without parentheses"),
            },
            parser.current_token().span,
        ));
    }

    let span = operator_token.span.to(operand.span());
    Ok(Expr::Unary(UnaryExpr {
        op,
        operand: Box::new(operand),
        span,
    }))
}

pub fn parse_conditional_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    let consequent = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let alternate = parse_expr(parser, BindingPower::Default)?;

    let span = left.span().to(alternate.span());
    Ok(Expr::Conditional(ConditionalExpr {
        test: Box::new(left),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
        span,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    // Only named functions are callable; `500(2)` is a syntax error.
    let callee = match left {
        Expr::Ident(ident) => ident,
        _ => {
            return Err(Error::new(
                ErrorKind::UnexpectedTokenDetailed {
                    token: String::from("("),
                    message: String::from("only a named function can be called"),
                },
                parser.current_token().span,
            ))
        }
    };

    parser.advance();

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Default)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            args.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        callee: callee.name,
        args,
        span: callee.span.to(close.span),
    }))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    if !matches!(left, Expr::Ident(_) | Expr::Member(_)) {
        return Err(Error::new(
            ErrorKind::UnexpectedTokenDetailed {
                token: String::from("."),
                message: String::from("member access requires a named value"),
            },
            parser.current_token().span,
        ));
    }

    parser.advance();
    let field_token = parser.expect(TokenKind::Identifier)?;

    let span = left.span().to(field_token.span);
    Ok(Expr::Member(MemberExpr {
        object: Box::new(left),
        field: field_token.value,
        span,
    }))
}

pub fn parse_subscript_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    if !matches!(left, Expr::Ident(_) | Expr::Member(_) | Expr::Subscript(_)) {
        return Err(Error::new(
            ErrorKind::UnexpectedTokenDetailed {
                token: String::from("["),
                message: String::from("subscript requires a named array value"),
            },
            parser.current_token().span,
        ));
    }

    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    let close = parser.expect(TokenKind::CloseBracket)?;

    let span = left.span().to(close.span);
    Ok(Expr::Subscript(SubscriptExpr {
        array: Box::new(left),
        index: Box::new(index),
        span,
    }))
}

pub fn parse_array_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();

    let mut elements = vec![];
    if parser.current_token_kind() != TokenKind::CloseBracket {
        elements.push(parse_expr(parser, BindingPower::Default)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            if parser.current_token_kind() == TokenKind::CloseBracket {
                return Err(Error::new(
                    ErrorKind::UnexpectedTokenDetailed {
                        token: String::from("]"),
                        message: String::from("trailing comma in array literal"),
                    },
                    parser.current_token().span,
                ));
            }
            elements.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    let close = parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::Array(ArrayExpr {
        elements,
        span: open.span.to(close.span),
    }))
}
