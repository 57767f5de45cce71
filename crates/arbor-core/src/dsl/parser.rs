use super::{Lexer, SpecNode, Token};
use crate::spec::{FieldSpec, QualifiedColumn, RelSource, RelSpec, TableSpec};
use crate::transform::Transforms;
use crate::{Error, Result};

pub(super) struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    transforms: &'a Transforms,
}

impl<'a> Parser<'a> {
    pub(super) fn new(src: &str, transforms: &'a Transforms) -> Result<Self> {
        Ok(Self {
            tokens: Lexer::new(src).tokenize()?,
            pos: 0,
            transforms,
        })
    }

    pub(super) fn parse(mut self) -> Result<TableSpec> {
        let node = self.read_node()?;
        if *self.peek() != Token::Eof {
            return Err(Error::invalid_spec("trailing input after table form"));
        }
        self.table(&node)
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens.get(self.pos).cloned().unwrap_or(Token::Eof);
        self.pos += 1;
        token
    }

    /// Reads one value node off the token stream.
    fn read_node(&mut self) -> Result<SpecNode> {
        match self.advance() {
            Token::Str(s) => Ok(SpecNode::Str(s)),
            Token::Keyword(s) => Ok(SpecNode::Keyword(s)),
            Token::Symbol(s) => Ok(SpecNode::Symbol(s)),
            Token::LParen => Ok(SpecNode::List(self.read_seq(Token::RParen)?)),
            Token::LBracket => Ok(SpecNode::Vec(self.read_seq(Token::RBracket)?)),
            Token::LBrace => Ok(SpecNode::Map(self.read_map()?)),
            Token::Eof => Err(Error::invalid_spec("unexpected end of input")),
            token => Err(Error::invalid_spec(format!("unbalanced `{token:?}`"))),
        }
    }

    fn read_seq(&mut self, close: Token) -> Result<Vec<SpecNode>> {
        let mut items = Vec::new();
        while *self.peek() != close {
            if *self.peek() == Token::Eof {
                return Err(Error::invalid_spec("unexpected end of input"));
            }
            items.push(self.read_node()?);
        }
        self.advance();
        Ok(items)
    }

    fn read_map(&mut self) -> Result<Vec<(SpecNode, SpecNode)>> {
        let mut pairs = Vec::new();
        while *self.peek() != Token::RBrace {
            if *self.peek() == Token::Eof {
                return Err(Error::invalid_spec("unexpected end of input"));
            }
            let key = self.read_node()?;
            if *self.peek() == Token::RBrace {
                return Err(Error::invalid_spec("map requires an even number of forms"));
            }
            let value = self.read_node()?;
            pairs.push((key, value));
        }
        self.advance();
        Ok(pairs)
    }

    /// Converts a `(Table name [:id "x"] :fields …)` node into a table spec.
    fn table(&self, node: &SpecNode) -> Result<TableSpec> {
        let SpecNode::List(items) = node else {
            return Err(Error::invalid_spec(format!(
                "expected a (Table …) form, got {}",
                node.shape()
            )));
        };

        let mut it = items.iter();
        match it.next() {
            Some(SpecNode::Symbol(tag)) if tag == "Table" => {}
            _ => return Err(Error::invalid_spec("expected the `Table` tag")),
        }
        let name = match it.next() {
            Some(SpecNode::Symbol(name)) => name.clone(),
            _ => return Err(Error::invalid_spec("expected a table name symbol")),
        };

        let mut id = None;
        let mut elements = Vec::new();
        let mut in_fields = false;
        while let Some(node) = it.next() {
            match node {
                SpecNode::Keyword(k) if k == "id" => match it.next() {
                    Some(SpecNode::Str(s)) => id = Some(s.clone()),
                    _ => return Err(Error::invalid_spec("`:id` expects a string value")),
                },
                SpecNode::Keyword(k) if k == "fields" => in_fields = true,
                SpecNode::Keyword(k) => {
                    return Err(Error::invalid_spec(format!("unknown table option `:{k}`")))
                }
                node if in_fields => elements.push(node),
                node => {
                    return Err(Error::invalid_spec(format!(
                        "expected `:fields` before {} element",
                        node.shape()
                    )))
                }
            }
        }

        let mut table = TableSpec::new(name, id);
        for node in elements {
            self.element(&mut table, node)?;
        }
        Ok(table)
    }

    fn element(&self, table: &mut TableSpec, node: &SpecNode) -> Result<()> {
        match node {
            SpecNode::Str(column) => {
                table.fields.push(FieldSpec::new(column.clone()));
                Ok(())
            }
            SpecNode::Vec(items) => {
                table.fields.push(self.field_vec(items)?);
                Ok(())
            }
            SpecNode::Map(pairs) => self.relationship(table, pairs),
            node => Err(Error::invalid_spec(format!(
                "expected a field or relationship, got {}",
                node.shape()
            ))),
        }
    }

    /// Parses a `["col" :as "alias" :flatten transform?]` vector.
    ///
    /// `:as` takes a string value, `:flatten` is a bare flag. Any other
    /// keyword followed by a string is preserved as a valued option; without
    /// one it is preserved as a boolean flag. A trailing symbol names a
    /// registered transform.
    fn field_vec(&self, items: &[SpecNode]) -> Result<FieldSpec> {
        let mut it = items.iter().peekable();
        let column = match it.next() {
            Some(SpecNode::Str(column)) => column.clone(),
            _ => {
                return Err(Error::invalid_spec(
                    "field vector must start with a column string",
                ))
            }
        };

        let mut field = FieldSpec::new(column);
        while let Some(node) = it.next() {
            match node {
                SpecNode::Keyword(k) if k == "as" => match it.next() {
                    Some(SpecNode::Str(s)) => field.alias = Some(s.clone()),
                    _ => return Err(Error::invalid_spec("`:as` expects a string value")),
                },
                SpecNode::Keyword(k) if k == "flatten" => field.flags.push(k.clone()),
                SpecNode::Keyword(k) => match it.peek() {
                    Some(SpecNode::Str(v)) => {
                        field.options.push((k.clone(), v.clone()));
                        it.next();
                    }
                    _ => field.flags.push(k.clone()),
                },
                SpecNode::Symbol(name) => {
                    if field.transform.is_some() {
                        return Err(Error::invalid_spec("field names more than one transform"));
                    }
                    field.transform = Some(self.transforms.resolve(name)?);
                }
                SpecNode::List(_) => {
                    return Err(Error::invalid_spec(
                        "inline transform expressions are not supported; register a named transform instead",
                    ))
                }
                node => {
                    return Err(Error::invalid_spec(format!(
                        "unexpected {} in field spec",
                        node.shape()
                    )))
                }
            }
        }
        Ok(field)
    }

    /// Parses a `{join-spec (Table …)}` relationship map.
    fn relationship(&self, table: &mut TableSpec, pairs: &[(SpecNode, SpecNode)]) -> Result<()> {
        if pairs.len() != 1 {
            return Err(Error::invalid_spec(
                "relationship map must have exactly one entry",
            ));
        }
        let (key, value) = &pairs[0];

        let SpecNode::Vec(items) = key else {
            return Err(Error::invalid_spec(format!(
                "relationship key must be a join spec vector, got {}",
                key.shape()
            )));
        };
        let join = self.field_vec(items)?;
        if join.transform.is_some() {
            return Err(Error::invalid_spec(
                "transform not allowed on a relationship column",
            ));
        }

        let target = self.table(value)?;

        // An underscore prefix marks a reverse reference: the join column
        // lives in the target table, pointing back at the source.
        let (column, reverse) = match join.column.strip_prefix('_') {
            Some(stripped) => (stripped.to_string(), true),
            None => (join.column.clone(), false),
        };
        if column.is_empty() {
            return Err(Error::invalid_spec("relationship column name is empty"));
        }
        let namespace = if reverse {
            target.name.clone()
        } else {
            table.name.clone()
        };

        let mut rel = RelSpec::new(
            RelSource {
                table: table.name.clone(),
                id: table.id.clone(),
            },
            QualifiedColumn::new(namespace, column),
            target,
        );
        rel.flatten = join.has_flag("flatten");
        rel.alias = join.alias;
        table.rels.push(rel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<TableSpec> {
        super::super::parse(src, &Transforms::default())
    }

    #[test]
    fn flat_table() {
        let table = parse(r#"(Table users :fields "name" "email")"#).unwrap();

        assert_eq!(table.name, "users");
        assert_eq!(table.id, "users_id");
        assert!(table.id_generated);
        assert_eq!(table.fields.len(), 2);
        assert_eq!(table.fields[0].column, "name");
        assert_eq!(table.fields[1].column, "email");
        assert!(table.rels.is_empty());
    }

    #[test]
    fn explicit_id() {
        let table = parse(r#"(Table users :id "uid" :fields "name")"#).unwrap();

        assert_eq!(table.id, "uid");
        assert!(!table.id_generated);
    }

    #[test]
    fn field_options() {
        let table = parse(
            r#"(Table users :fields ["full_name" :as "name.full"]
                                    ["cover" binary-string]
                                    ["x" :custom "v" :marked])"#,
        )
        .unwrap();

        assert_eq!(table.fields[0].alias.as_deref(), Some("name.full"));
        assert_eq!(table.fields[0].path().keys(), ["name", "full"]);
        assert_eq!(
            table.fields[1].transform.as_ref().map(|t| t.name()),
            Some("binary-string")
        );
        assert_eq!(
            table.fields[2].options,
            vec![("custom".to_string(), "v".to_string())]
        );
        assert!(table.fields[2].has_flag("marked"));
    }

    #[test]
    fn forward_relationship_namespaced_to_source() {
        let table = parse(
            r#"(Table album :fields "title"
                 {["artist_id" :flatten] (Table artist :fields "name")})"#,
        )
        .unwrap();

        assert_eq!(table.rels.len(), 1);
        let rel = &table.rels[0];
        assert_eq!(rel.source.table, "album");
        assert_eq!(rel.source.id, "album_id");
        assert_eq!(rel.column, QualifiedColumn::new("album", "artist_id"));
        assert_eq!(rel.target.name, "artist");
        assert!(rel.flatten);
    }

    #[test]
    fn reverse_relationship_namespaced_to_target() {
        let table = parse(
            r#"(Table album :fields "title"
                 {["_album_id" :as "tracks"] (Table tracks :fields "name")})"#,
        )
        .unwrap();

        let rel = &table.rels[0];
        assert_eq!(rel.column, QualifiedColumn::new("tracks", "album_id"));
        assert_eq!(rel.alias.as_deref(), Some("tracks"));
    }

    #[test]
    fn missing_table_tag_fails() {
        assert!(parse(r#"(Tabel users :fields "name")"#)
            .unwrap_err()
            .is_invalid_spec());
        assert!(parse(r#""users""#).unwrap_err().is_invalid_spec());
    }

    #[test]
    fn relationship_map_with_two_entries_fails() {
        let err = parse(
            r#"(Table a :fields
                 {["b_id"] (Table b :fields "x")
                  ["c_id"] (Table c :fields "y")})"#,
        )
        .unwrap_err();
        assert!(err.is_invalid_spec());
    }

    #[test]
    fn relationship_value_must_be_table_form() {
        let err = parse(r#"(Table a :fields {["b_id"] "b"})"#).unwrap_err();
        assert!(err.is_invalid_spec());
    }

    #[test]
    fn inline_transform_is_rejected() {
        let err = parse(r#"(Table a :fields ["x" (str "y")])"#).unwrap_err();
        assert!(err.is_invalid_spec());
    }

    #[test]
    fn unknown_transform_fails() {
        let err = parse(r#"(Table a :fields ["x" frobnicate])"#).unwrap_err();
        assert!(err.is_invalid_spec());
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn elements_require_fields_keyword() {
        let err = parse(r#"(Table a "x")"#).unwrap_err();
        assert!(err.is_invalid_spec());
    }
}
