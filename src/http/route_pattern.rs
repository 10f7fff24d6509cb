//! Route path patterns.
//!
//! Paths accept `<name>` / `<converter:name>` placeholders as well as
//! Axum's native `{name}` / `{*name}` captures. A parsed [`RoutePattern`]
//! renders to the Axum path used for matching and to the placeholder URL
//! shown in route listings (`/hello/<name>` lists as `/hello/[name]`).

use std::collections::HashSet;
use std::fmt;

use crate::error::FacadeError;

/// Value converter declared on a `<converter:name>` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// Any text without a slash (the default).
    String,
    /// Integer segment.
    Int,
    /// Floating point segment.
    Float,
    /// UUID segment.
    Uuid,
    /// Remainder of the path, slashes included.
    Path,
}

impl Converter {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "string" | "default" => Some(Self::String),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "uuid" => Some(Self::Uuid),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    /// Returns `true` if `value` is a valid segment for this converter.
    ///
    /// `int` takes unsigned digits, `float` digits around a single dot and
    /// `uuid` the hyphenated form; `string` and `path` take anything.
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::String | Self::Path => true,
            Self::Int => is_digits(value),
            Self::Float => value
                .split_once('.')
                .is_some_and(|(whole, frac)| is_digits(whole) && is_digits(frac)),
            Self::Uuid => value.len() == 36 && uuid::Uuid::try_parse(value).is_ok(),
        }
    }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// One `/`-separated piece of a route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text.
    Static(String),
    /// Single-segment capture.
    Param {
        /// Capture name.
        name: String,
        /// Declared converter.
        converter: Converter,
    },
    /// Capture of the remaining path. Only valid as the last segment.
    CatchAll(String),
}

/// A validated route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parses and validates a route path.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::InvalidRoute`] if the path is empty, does not
    /// start with `/`, has an unbalanced or empty placeholder, an unknown
    /// converter, a repeated capture name, or a catch-all that is not the
    /// last segment.
    pub fn parse(path: &str) -> Result<Self, FacadeError> {
        if path.is_empty() {
            return Err(FacadeError::invalid_route(path, "path must not be empty"));
        }
        let Some(rest) = path.strip_prefix('/') else {
            return Err(FacadeError::invalid_route(path, "path must start with `/`"));
        };

        let pieces: Vec<&str> = rest.split('/').collect();
        let last = pieces.len().saturating_sub(1);
        let mut seen = HashSet::new();
        let mut segments = Vec::with_capacity(pieces.len());

        for (idx, piece) in pieces.iter().enumerate() {
            let segment = parse_segment(path, piece)?;
            match &segment {
                Segment::Param { name, .. } | Segment::CatchAll(name) => {
                    if !seen.insert(name.clone()) {
                        return Err(FacadeError::invalid_route(
                            path,
                            format!("capture `{name}` appears more than once"),
                        ));
                    }
                }
                Segment::Static(_) => {}
            }
            if matches!(segment, Segment::CatchAll(_)) && idx != last {
                return Err(FacadeError::invalid_route(
                    path,
                    "catch-all capture must be the last segment",
                ));
            }
            segments.push(segment);
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// Returns the path as it was registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns capture names in path order.
    #[must_use]
    pub fn arguments(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param { name, .. } | Segment::CatchAll(name) => Some(name.as_str()),
                Segment::Static(_) => None,
            })
            .collect()
    }

    /// Returns the path in Axum's capture syntax.
    #[must_use]
    pub fn axum_path(&self) -> String {
        self.render(|segment| match segment {
            Segment::Static(text) => text.clone(),
            Segment::Param { name, .. } => format!("{{{name}}}"),
            Segment::CatchAll(name) => format!("{{*{name}}}"),
        })
    }

    /// Returns the listing URL: each capture replaced by `[name]`.
    #[must_use]
    pub fn placeholder_url(&self) -> String {
        self.render(|segment| match segment {
            Segment::Static(text) => text.clone(),
            Segment::Param { name, .. } | Segment::CatchAll(name) => format!("[{name}]"),
        })
    }

    /// Returns the captures whose converter restricts the segment value.
    #[must_use]
    pub fn typed_captures(&self) -> Vec<(String, Converter)> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param { name, converter } if *converter != Converter::String => {
                    Some((name.clone(), *converter))
                }
                _ => None,
            })
            .collect()
    }

    /// Returns `true` if the router cannot hold both patterns.
    ///
    /// Literal segments always win over captures, so a literal beside a
    /// capture is fine. At one position the router keeps a single capture
    /// node: two single-segment captures must share a name, and a
    /// catch-all cannot sit beside any other capture.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        for pair in self.segments.iter().zip(&other.segments) {
            match pair {
                (Segment::Static(a), Segment::Static(b)) if a == b => {}
                (Segment::Static(_), _) | (_, Segment::Static(_)) => return false,
                (Segment::Param { name: a, .. }, Segment::Param { name: b, .. }) => {
                    if a != b {
                        return true;
                    }
                }
                (Segment::CatchAll(_), _) | (_, Segment::CatchAll(_)) => return true,
            }
        }
        self.segments.len() == other.segments.len()
    }

    fn render(&self, f: impl Fn(&Segment) -> String) -> String {
        let parts: Vec<String> = self.segments.iter().map(f).collect();
        format!("/{}", parts.join("/"))
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segment(path: &str, piece: &str) -> Result<Segment, FacadeError> {
    if let Some(inner) = piece.strip_prefix('<') {
        let Some(inner) = inner.strip_suffix('>') else {
            return Err(FacadeError::invalid_route(path, format!("unbalanced `<` in `{piece}`")));
        };
        let (converter, name) = match inner.split_once(':') {
            Some((conv, name)) => {
                let converter = Converter::parse(conv).ok_or_else(|| {
                    FacadeError::invalid_route(path, format!("unknown converter `{conv}`"))
                })?;
                (converter, name)
            }
            None => (Converter::String, inner),
        };
        let name = capture_name(path, name)?;
        return Ok(if converter == Converter::Path {
            Segment::CatchAll(name)
        } else {
            Segment::Param { name, converter }
        });
    }

    if let Some(inner) = piece.strip_prefix('{') {
        let Some(inner) = inner.strip_suffix('}') else {
            return Err(FacadeError::invalid_route(path, format!("unbalanced `{{` in `{piece}`")));
        };
        return Ok(match inner.strip_prefix('*') {
            Some(name) => Segment::CatchAll(capture_name(path, name)?),
            None => Segment::Param {
                name: capture_name(path, inner)?,
                converter: Converter::String,
            },
        });
    }

    if piece.contains(['<', '>', '{', '}']) {
        return Err(FacadeError::invalid_route(
            path,
            format!("captures must span a whole segment: `{piece}`"),
        ));
    }
    if piece.starts_with([':', '*']) {
        return Err(FacadeError::invalid_route(
            path,
            format!("segment `{piece}` must not start with `:` or `*`"),
        ));
    }
    Ok(Segment::Static(piece.to_string()))
}

fn capture_name(path: &str, name: &str) -> Result<String, FacadeError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FacadeError::invalid_route(
            path,
            format!("invalid capture name `{name}`"),
        ));
    }
    Ok(name.to_string())
}
