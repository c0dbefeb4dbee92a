use crate::{
    ast::{
        ast::Stmt,
        statements::{
            ArrayPopStmt, ArrayPushStmt, AssignStmt, BreakStmt, ElseTail, ExpressionStmt,
            FnDeclStmt, ForRangeStmt, IfStmt, PrintStmt, RepeatStmt, ReturnStmt, VarDeclStmt,
            WhileStmt,
        },
    },
    errors::errors::{Error, ErrorKind},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Span,
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    // `idol` and a leading identifier both need lookahead: `idol` is a
    // declaration keyword only when followed by `name =`, otherwise it
    // is the true literal; an identifier may start an assignment, an
    // array push/pop, or a plain expression statement.
    match parser.current_token_kind() {
        TokenKind::Idol
            if parser.peek_kind(1) == TokenKind::Identifier
                && parser.peek_kind(2) == TokenKind::Assignment =>
        {
            return parse_var_decl_stmt(parser);
        }
        TokenKind::Identifier => match parser.peek_kind(1) {
            TokenKind::Assignment => return parse_assign_stmt(parser),
            TokenKind::Dot if parser.peek_kind(2) == TokenKind::Identifier => {
                match parser.peek(2).value.as_str() {
                    "addMember" => return parse_array_push_stmt(parser),
                    "graduate" => return parse_array_pop_stmt(parser),
                    _ => {}
                }
            }
            _ => {}
        },
        _ => {}
    }

    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    let expression = parse_expr(parser, BindingPower::Default)?;
    Ok(Stmt::Expression(ExpressionStmt {
        span: expression.span(),
        expression,
    }))
}

/// `{ stmt* }`; returns the body plus the braces' span.
fn parse_block(parser: &mut Parser) -> Result<(Vec<Stmt>, Span), Error> {
    let open = parser.expect(TokenKind::OpenCurly)?;

    let mut statements = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly
        && parser.current_token_kind() != TokenKind::EOF
    {
        statements.push(parse_stmt(parser)?);
    }

    let close = parser.expect(TokenKind::CloseCurly)?;
    Ok((statements, open.span.to(close.span)))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();

    let error = Error::new(
        ErrorKind::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected identifier during variable declaration"),
        },
        parser.current_token().span,
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;

    let span = start_token.span.to(value.span());
    Ok(Stmt::VarDecl(VarDeclStmt { name, value, span }))
}

pub fn parse_assign_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let name_token = parser.advance().clone();
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;

    let span = name_token.span.to(value.span());
    Ok(Stmt::Assign(AssignStmt {
        name: name_token.value,
        value,
        span,
    }))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();

    let name = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        params.push(parser.expect(TokenKind::Identifier)?.value);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            params.push(parser.expect(TokenKind::Identifier)?.value);
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    let (body, body_span) = parse_block(parser)?;

    Ok(Stmt::FnDecl(FnDeclStmt {
        name,
        params,
        body,
        span: start_token.span.to(body_span),
    }))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();
    let value = parse_expr(parser, BindingPower::Default)?;

    let span = start_token.span.to(value.span());
    Ok(Stmt::Print(PrintStmt { value, span }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();
    Ok(Stmt::Break(BreakStmt { span: token.span }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();

    // Short return: without terminators, `encore` carries a value
    // exactly when the next token can begin an expression.
    let value = if parser
        .get_nud_lookup()
        .contains_key(&parser.current_token_kind())
    {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let span = match &value {
        Some(expr) => start_token.span.to(expr.span()),
        None => start_token.span,
    };
    Ok(Stmt::Return(ReturnStmt { value, span }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::If(parse_if(parser)?))
}

fn parse_if(parser: &mut Parser) -> Result<IfStmt, Error> {
    let start_token = parser.advance().clone();

    let test = parse_expr(parser, BindingPower::Default)?;
    let (consequent, mut end_span) = parse_block(parser)?;

    let alternate = if parser.current_token_kind() == TokenKind::Fate {
        parser.advance();
        if parser.current_token_kind() == TokenKind::PlotTwist {
            let nested = parse_if(parser)?;
            end_span = nested.span;
            Some(ElseTail::If(Box::new(nested)))
        } else {
            let (block, block_span) = parse_block(parser)?;
            end_span = block_span;
            Some(ElseTail::Block(block))
        }
    } else {
        None
    };

    Ok(IfStmt {
        test,
        consequent,
        alternate,
        span: start_token.span.to(end_span),
    })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();

    let test = parse_expr(parser, BindingPower::Default)?;
    let (body, body_span) = parse_block(parser)?;

    Ok(Stmt::While(WhileStmt {
        test,
        body,
        span: start_token.span.to(body_span),
    }))
}

pub fn parse_repeat_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();

    let count = parse_expr(parser, BindingPower::Default)?;
    let (body, body_span) = parse_block(parser)?;

    Ok(Stmt::Repeat(RepeatStmt {
        count,
        body,
        span: start_token.span.to(body_span),
    }))
}

pub fn parse_for_range_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();

    let iterator = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::In)?;
    let start = parse_expr(parser, BindingPower::Default)?;

    let inclusive = match parser.current_token_kind() {
        TokenKind::Till => {
            parser.advance();
            false
        }
        TokenKind::Through => {
            parser.advance();
            true
        }
        _ => {
            return Err(Error::new(
                ErrorKind::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: String::from("expected till or through in range"),
                },
                parser.current_token().span,
            ))
        }
    };

    let end = parse_expr(parser, BindingPower::Default)?;
    let (body, body_span) = parse_block(parser)?;

    Ok(Stmt::ForRange(ForRangeStmt {
        iterator,
        start,
        inclusive,
        end,
        body,
        span: start_token.span.to(body_span),
    }))
}

pub fn parse_array_push_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let name_token = parser.advance().clone();
    parser.expect(TokenKind::Dot)?;
    parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::OpenParen)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(Stmt::ArrayPush(ArrayPushStmt {
        name: name_token.value,
        value,
        span: name_token.span.to(close.span),
    }))
}

pub fn parse_array_pop_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let name_token = parser.advance().clone();
    parser.expect(TokenKind::Dot)?;
    parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::OpenParen)?;
    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(Stmt::ArrayPop(ArrayPopStmt {
        name: name_token.value,
        span: name_token.span.to(close.span),
    }))
}
