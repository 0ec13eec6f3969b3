//! Streaming tokenizer for SWOB-ML documents.
//!
//! Flattens the XML event stream into a single-pass sequence of tokens,
//! with each element's attributes following its start tag in document order.

use std::collections::VecDeque;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{Error, Result};

/// One token of an XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag(String),
    Attr { name: String, value: String },
    Text(String),
    EndTag(String),
}

/// Tokens of one document.
///
/// This is a finite iterator; it ends after the first error.
pub struct Tokens<'a> {
    reader: Reader<&'a [u8]>,
    pending: VecDeque<Token>,
    done: bool,
}

impl<'a> Tokens<'a> {
    pub fn new(document: &'a str) -> Self {
        let mut reader = Reader::from_str(document);
        reader.trim_text(true);
        Tokens {
            reader,
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// Queue the tokens for an element's start tag: its name, then its attributes.
    fn queue_start(&mut self, start: &BytesStart) -> Result<()> {
        self.pending.push_back(Token::StartTag(name(start.name().as_ref())));
        for attr in start.attributes() {
            let attr = attr?;
            let value = attr.unescape_value().map_err(|e| self.xml_error(e))?;
            self.pending.push_back(Token::Attr {
                name: name(attr.key.as_ref()),
                value: value.into_owned(),
            });
        }
        Ok(())
    }

    /// Read events until at least one token is queued or the document ends.
    fn advance(&mut self) -> Result<()> {
        while self.pending.is_empty() && !self.done {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => self.queue_start(&e)?,
                Ok(Event::Empty(e)) => {
                    self.queue_start(&e)?;
                    self.pending.push_back(Token::EndTag(name(e.name().as_ref())));
                }
                Ok(Event::End(e)) => {
                    self.pending.push_back(Token::EndTag(name(e.name().as_ref())))
                }
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| self.xml_error(e))?;
                    self.pending.push_back(Token::Text(text.into_owned()));
                }
                Ok(Event::CData(t)) => {
                    let text = self
                        .reader
                        .decoder()
                        .decode(&t)
                        .map_err(|e| self.xml_error(e))?;
                    self.pending.push_back(Token::Text(text.into_owned()));
                }
                Ok(Event::Eof) => self.done = true,
                // Declarations, comments, processing instructions, doctypes.
                Ok(_) => {}
                Err(e) => return Err(self.xml_error(e)),
            }
        }
        Ok(())
    }

    fn xml_error(&self, source: quick_xml::Error) -> Error {
        Error::Xml {
            position: self.reader.buffer_position(),
            source,
        }
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.advance() {
            self.done = true;
            self.pending.clear();
            return Some(Err(e));
        }
        self.pending.pop_front().map(Ok)
    }
}

fn name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(doc: &str) -> Vec<Token> {
        Tokens::new(doc)
            .collect::<Result<Vec<_>>>()
            .expect("document should tokenize")
    }

    fn attr(name: &str, value: &str) -> Token {
        Token::Attr {
            name: name.to_owned(),
            value: value.to_owned(),
        }
    }

    #[test]
    fn attributes_follow_start_tag() {
        let got = tokens(
            r#"<?xml version="1.0"?>
            <elements>
              <!-- depth -->
              <element name="avg_snw_dpth_pst5mts" uom="cm" value="31"/>
            </elements>"#,
        );
        assert_eq!(
            got,
            vec![
                Token::StartTag("elements".into()),
                Token::StartTag("element".into()),
                attr("name", "avg_snw_dpth_pst5mts"),
                attr("uom", "cm"),
                attr("value", "31"),
                Token::EndTag("element".into()),
                Token::EndTag("elements".into()),
            ]
        );
    }

    #[test]
    fn text_is_unescaped() {
        let got = tokens("<gml:pos>51.3 &amp; -117.5</gml:pos>");
        assert_eq!(
            got,
            vec![
                Token::StartTag("gml:pos".into()),
                Token::Text("51.3 & -117.5".into()),
                Token::EndTag("gml:pos".into()),
            ]
        );
    }

    #[test]
    fn cdata_is_text() {
        let got = tokens("<v><![CDATA[a < b &amp; c]]></v>");
        assert_eq!(
            got,
            vec![
                Token::StartTag("v".into()),
                Token::Text("a < b &amp; c".into()),
                Token::EndTag("v".into()),
            ]
        );
    }

    #[test]
    fn stops_after_error() {
        let mut it = Tokens::new("<a><b></a>");
        let mut saw_error = false;
        for t in &mut it {
            if t.is_err() {
                saw_error = true;
                break;
            }
        }
        assert!(saw_error, "mismatched tags should be an error");
        assert!(it.next().is_none());
    }
}
