//! Minimal XML-RPC codec on top of `quick-xml` events
//!
//! Covers what the Gandi zone API exchanges: `int`/`i4`/`i8`, `boolean`,
//! `string`, `double`, `struct`, `array` and `nil`. `dateTime.iso8601` and
//! `base64` are decoded as their raw text.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::collections::BTreeMap;
use thiserror::Error;

/// An XML-RPC value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    String(String),
    Double(f64),
    Struct(BTreeMap<String, Value>),
    Array(Vec<Value>),
    Nil,
}

impl Value {
    /// Build a struct value from `(name, value)` pairs
    pub fn structure<I, K>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Struct(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a struct member
    pub fn member(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members.get(name),
            _ => None,
        }
    }

    fn encode(&self, w: &mut XmlWriter) -> quick_xml::Result<()> {
        open(w, "value")?;
        match self {
            Value::Int(i) => text_element(w, "int", &i.to_string())?,
            Value::Bool(b) => text_element(w, "boolean", if *b { "1" } else { "0" })?,
            Value::String(s) => text_element(w, "string", s)?,
            Value::Double(d) => text_element(w, "double", &d.to_string())?,
            Value::Struct(members) => {
                open(w, "struct")?;
                for (name, value) in members {
                    open(w, "member")?;
                    text_element(w, "name", name)?;
                    value.encode(w)?;
                    close(w, "member")?;
                }
                close(w, "struct")?;
            }
            Value::Array(items) => {
                open(w, "array")?;
                open(w, "data")?;
                for item in items {
                    item.encode(w)?;
                }
                close(w, "data")?;
                close(w, "array")?;
            }
            Value::Nil => w.write_event(Event::Empty(BytesStart::new("nil")))?,
        }
        close(w, "value")
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

/// Why a response could not be turned into a value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    /// The server answered with a `<fault>`
    #[error("fault {code}: {message}")]
    Fault { code: i64, message: String },

    /// The body is not a well-formed XML-RPC response
    #[error("malformed XML-RPC response: {0}")]
    Malformed(String),
}

fn malformed(msg: impl Into<String>) -> ResponseError {
    ResponseError::Malformed(msg.into())
}

type XmlWriter = Writer<Vec<u8>>;

fn open(w: &mut XmlWriter, tag: &str) -> quick_xml::Result<()> {
    w.write_event(Event::Start(BytesStart::new(tag)))
}

fn close(w: &mut XmlWriter, tag: &str) -> quick_xml::Result<()> {
    w.write_event(Event::End(BytesEnd::new(tag)))
}

fn text_element(w: &mut XmlWriter, tag: &str, text: &str) -> quick_xml::Result<()> {
    open(w, tag)?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    close(w, tag)
}

/// Encode a `methodCall` document
pub fn encode_call(method: &str, params: &[Value]) -> quick_xml::Result<String> {
    let mut w = Writer::new(Vec::new());

    w.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
    open(&mut w, "methodCall")?;
    text_element(&mut w, "methodName", method)?;
    open(&mut w, "params")?;
    for param in params {
        open(&mut w, "param")?;
        param.encode(&mut w)?;
        close(&mut w, "param")?;
    }
    close(&mut w, "params")?;
    close(&mut w, "methodCall")?;

    Ok(String::from_utf8_lossy(&w.into_inner()).into_owned())
}

/// Decode a `methodResponse` document into its single return value
pub fn parse_response(body: &str) -> Result<Value, ResponseError> {
    let mut reader = ResponseReader::new(body);

    reader.expect_open("methodResponse")?;
    let result = match reader.next_element()? {
        Token::Open(tag) if tag == "params" => {
            reader.expect_open("param")?;
            reader.expect_open("value")?;
            let value = reader.parse_value()?;
            reader.expect_close("param")?;
            reader.expect_close("params")?;
            Ok(value)
        }
        Token::Open(tag) if tag == "fault" => {
            reader.expect_open("value")?;
            let fault = reader.parse_value()?;
            reader.expect_close("fault")?;
            Err(ResponseError::Fault {
                code: fault.member("faultCode").and_then(Value::as_i64).unwrap_or(0),
                message: fault
                    .member("faultString")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        }
        other => return Err(malformed(format!("unexpected {}", other))),
    };
    reader.expect_close("methodResponse")?;

    result
}

/// The subset of XML events the grammar cares about
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open(String),
    Close(String),
    Empty(String),
    Text(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Open(tag) => write!(f, "<{}>", tag),
            Token::Close(tag) => write!(f, "</{}>", tag),
            Token::Empty(tag) => write!(f, "<{}/>", tag),
            Token::Text(_) => f.write_str("text"),
        }
    }
}

fn tag_name(name: &[u8]) -> Result<String, ResponseError> {
    std::str::from_utf8(name)
        .map(str::to_string)
        .map_err(|e| malformed(e.to_string()))
}

struct ResponseReader<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> ResponseReader<'a> {
    fn new(body: &'a str) -> Self {
        Self {
            reader: Reader::from_str(body),
        }
    }

    fn next_token(&mut self) -> Result<Token, ResponseError> {
        loop {
            let event = self
                .reader
                .read_event()
                .map_err(|e| malformed(e.to_string()))?;

            let token = match event {
                Event::Start(e) => Token::Open(tag_name(e.name().as_ref())?),
                Event::End(e) => Token::Close(tag_name(e.name().as_ref())?),
                Event::Empty(e) => Token::Empty(tag_name(e.name().as_ref())?),
                Event::Text(t) => Token::Text(
                    t.unescape()
                        .map_err(|e| malformed(e.to_string()))?
                        .into_owned(),
                ),
                Event::CData(c) => Token::Text(
                    std::str::from_utf8(&c.into_inner())
                        .map_err(|e| malformed(e.to_string()))?
                        .to_string(),
                ),
                Event::Eof => return Err(malformed("unexpected end of document")),
                // declarations, comments, processing instructions
                _ => continue,
            };
            return Ok(token);
        }
    }

    /// Next token that is not inter-element whitespace
    fn next_element(&mut self) -> Result<Token, ResponseError> {
        loop {
            match self.next_token()? {
                Token::Text(t) if t.trim().is_empty() => continue,
                token => return Ok(token),
            }
        }
    }

    fn expect_open(&mut self, tag: &str) -> Result<(), ResponseError> {
        match self.next_element()? {
            Token::Open(t) if t == tag => Ok(()),
            other => Err(malformed(format!("expected <{}>, found {}", tag, other))),
        }
    }

    fn expect_close(&mut self, tag: &str) -> Result<(), ResponseError> {
        match self.next_element()? {
            Token::Close(t) if t == tag => Ok(()),
            other => Err(malformed(format!("expected </{}>, found {}", tag, other))),
        }
    }

    /// Text content up to the closing `tag`
    fn text_until_close(&mut self, tag: &str) -> Result<String, ResponseError> {
        let mut text = String::new();
        loop {
            match self.next_token()? {
                Token::Text(t) => text.push_str(&t),
                Token::Close(t) if t == tag => return Ok(text),
                other => return Err(malformed(format!("unexpected {} in <{}>", other, tag))),
            }
        }
    }

    /// Parse the body of a `<value>` whose open tag was already consumed
    fn parse_value(&mut self) -> Result<Value, ResponseError> {
        let mut text = String::new();
        loop {
            match self.next_token()? {
                Token::Text(t) => text.push_str(&t),
                // untyped values are strings
                Token::Close(t) if t == "value" => return Ok(Value::String(text)),
                Token::Empty(tag) => {
                    let value = match tag.as_str() {
                        "nil" => Value::Nil,
                        "string" => Value::String(String::new()),
                        "struct" => Value::Struct(BTreeMap::new()),
                        other => return Err(malformed(format!("empty <{}/>", other))),
                    };
                    self.expect_close("value")?;
                    return Ok(value);
                }
                Token::Open(tag) => {
                    let value = self.parse_typed(&tag)?;
                    self.expect_close("value")?;
                    return Ok(value);
                }
                other => return Err(malformed(format!("unexpected {} in <value>", other))),
            }
        }
    }

    fn parse_typed(&mut self, tag: &str) -> Result<Value, ResponseError> {
        match tag {
            "int" | "i4" | "i8" => {
                let text = self.text_until_close(tag)?;
                text.trim()
                    .parse()
                    .map(Value::Int)
                    .map_err(|_| malformed(format!("invalid integer {:?}", text)))
            }
            "boolean" => match self.text_until_close(tag)?.trim() {
                "1" => Ok(Value::Bool(true)),
                "0" => Ok(Value::Bool(false)),
                other => Err(malformed(format!("invalid boolean {:?}", other))),
            },
            "double" => {
                let text = self.text_until_close(tag)?;
                text.trim()
                    .parse()
                    .map(Value::Double)
                    .map_err(|_| malformed(format!("invalid double {:?}", text)))
            }
            "string" | "dateTime.iso8601" | "base64" => {
                self.text_until_close(tag).map(Value::String)
            }
            "nil" => {
                self.expect_close("nil")?;
                Ok(Value::Nil)
            }
            "struct" => self.parse_struct(),
            "array" => self.parse_array(),
            other => Err(malformed(format!("unsupported type <{}>", other))),
        }
    }

    fn parse_struct(&mut self) -> Result<Value, ResponseError> {
        let mut members = BTreeMap::new();
        loop {
            match self.next_element()? {
                Token::Close(t) if t == "struct" => return Ok(Value::Struct(members)),
                Token::Open(t) if t == "member" => {
                    self.expect_open("name")?;
                    let name = self.text_until_close("name")?;
                    self.expect_open("value")?;
                    let value = self.parse_value()?;
                    self.expect_close("member")?;
                    members.insert(name.trim().to_string(), value);
                }
                other => return Err(malformed(format!("unexpected {} in <struct>", other))),
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value, ResponseError> {
        let mut items = Vec::new();
        match self.next_element()? {
            Token::Empty(t) if t == "data" => {}
            Token::Open(t) if t == "data" => loop {
                match self.next_element()? {
                    Token::Close(t) if t == "data" => break,
                    Token::Open(t) if t == "value" => items.push(self.parse_value()?),
                    other => return Err(malformed(format!("unexpected {} in <data>", other))),
                }
            },
            other => return Err(malformed(format!("expected <data>, found {}", other))),
        }
        self.expect_close("array")?;
        Ok(Value::Array(items))
    }
}
