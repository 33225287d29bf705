//! Tokenizer for predicate bodies.

use super::PredicateError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
	Integer(i64),
	Float(f64),
	Text(String),
	Ident(String),
	True,
	False,
	Plus,
	Minus,
	Star,
	Slash,
	Percent,
	Bang,
	Lt,
	Le,
	Gt,
	Ge,
	Eq,
	Ne,
	And,
	Or,
	LParen,
	RParen,
	Comma,
	Dot,
	Eof,
}

impl Token {
	pub(crate) fn describe(&self) -> String {
		match self {
			Token::Integer(v) => v.to_string(),
			Token::Float(v) => v.to_string(),
			Token::Text(v) => format!("{v:?}"),
			Token::Ident(v) => v.clone(),
			Token::True => "true".into(),
			Token::False => "false".into(),
			Token::Plus => "+".into(),
			Token::Minus => "-".into(),
			Token::Star => "*".into(),
			Token::Slash => "/".into(),
			Token::Percent => "%".into(),
			Token::Bang => "!".into(),
			Token::Lt => "<".into(),
			Token::Le => "<=".into(),
			Token::Gt => ">".into(),
			Token::Ge => ">=".into(),
			Token::Eq => "==".into(),
			Token::Ne => "!=".into(),
			Token::And => "&&".into(),
			Token::Or => "||".into(),
			Token::LParen => "(".into(),
			Token::RParen => ")".into(),
			Token::Comma => ",".into(),
			Token::Dot => ".".into(),
			Token::Eof => "end of expression".into(),
		}
	}
}

/// A token and its byte offset in the body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
	pub token: Token,
	pub pos: usize,
}

pub(crate) fn tokenize(src: &str) -> Result<Vec<Spanned>, PredicateError> {
	let mut lexer = Lexer { src, pos: 0 };
	let mut tokens = Vec::new();
	loop {
		let spanned = lexer.next_token()?;
		let done = spanned.token == Token::Eof;
		tokens.push(spanned);
		if done {
			return Ok(tokens);
		}
	}
}

struct Lexer<'a> {
	src: &'a str,
	pos: usize,
}

impl Lexer<'_> {
	fn peek(&self) -> Option<char> {
		self.src[self.pos..].chars().next()
	}

	fn peek_second(&self) -> Option<char> {
		let mut chars = self.src[self.pos..].chars();
		chars.next();
		chars.next()
	}

	fn bump(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.pos += ch.len_utf8();
		Some(ch)
	}

	fn eat(&mut self, expected: char) -> bool {
		if self.peek() == Some(expected) {
			self.pos += expected.len_utf8();
			true
		} else {
			false
		}
	}

	fn next_token(&mut self) -> Result<Spanned, PredicateError> {
		while self.peek().is_some_and(char::is_whitespace) {
			self.bump();
		}

		let pos = self.pos;
		let Some(ch) = self.bump() else {
			return Ok(Spanned { token: Token::Eof, pos });
		};

		let token = match ch {
			'+' => Token::Plus,
			'-' => Token::Minus,
			'*' => Token::Star,
			'/' => Token::Slash,
			'%' => Token::Percent,
			'(' => Token::LParen,
			')' => Token::RParen,
			',' => Token::Comma,
			'.' => Token::Dot,
			'!' if self.eat('=') => Token::Ne,
			'!' => Token::Bang,
			'<' if self.eat('=') => Token::Le,
			'<' if self.eat('>') => Token::Ne,
			'<' => Token::Lt,
			'>' if self.eat('=') => Token::Ge,
			'>' => Token::Gt,
			'=' => {
				self.eat('=');
				Token::Eq
			}
			'&' if self.eat('&') => Token::And,
			'|' if self.eat('|') => Token::Or,
			'"' | '\'' => self.string(ch, pos)?,
			c if c.is_ascii_digit() => self.number(pos)?,
			c if c.is_alphabetic() || c == '_' => self.word(pos),
			other => return Err(PredicateError::UnexpectedChar { ch: other, pos }),
		};

		Ok(Spanned { token, pos })
	}

	fn string(&mut self, quote: char, start: usize) -> Result<Token, PredicateError> {
		let mut text = String::new();
		loop {
			match self.bump() {
				None => return Err(PredicateError::UnterminatedString { pos: start }),
				Some(c) if c == quote => return Ok(Token::Text(text)),
				Some('\\') => match self.bump() {
					Some('n') => text.push('\n'),
					Some('t') => text.push('\t'),
					Some(c @ ('\\' | '"' | '\'')) => text.push(c),
					Some(other) => {
						text.push('\\');
						text.push(other);
					}
					None => return Err(PredicateError::UnterminatedString { pos: start }),
				},
				Some(c) => text.push(c),
			}
		}
	}

	fn number(&mut self, start: usize) -> Result<Token, PredicateError> {
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.bump();
		}

		let is_float = self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit());
		if is_float {
			self.bump();
			while self.peek().is_some_and(|c| c.is_ascii_digit()) {
				self.bump();
			}
		}

		let text = &self.src[start..self.pos];
		let invalid = || PredicateError::InvalidNumber {
			text: text.to_string(),
			pos: start,
		};
		if is_float {
			text.parse::<f64>().map(Token::Float).map_err(|_| invalid())
		} else {
			text.parse::<i64>().map(Token::Integer).map_err(|_| invalid())
		}
	}

	fn word(&mut self, start: usize) -> Token {
		while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
			self.bump();
		}

		let word = &self.src[start..self.pos];
		match word.to_ascii_lowercase().as_str() {
			"true" => Token::True,
			"false" => Token::False,
			"and" => Token::And,
			"or" => Token::Or,
			"not" => Token::Bang,
			_ => Token::Ident(word.to_string()),
		}
	}
}
