use crate::error::ParseError;
use crate::level::{Conditional, EdgeSpec, Level, LevelSpec, Value};
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// Matches one `levels[N] = "edges\n" + "values\n" + "carry\n" + "moves\n"` record.
/// Compiled once, used for every document.
static LEVEL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn level_pattern() -> &'static Regex {
    LEVEL_PATTERN.get_or_init(|| {
        Regex::new(r#"(?sU)levels\[(\d+)\] = "(.+)\\n.+"(.+)\\n.+"(\d+)\\n.+"(\d+)\\n"#)
            .expect("level pattern regex must compile")
    })
}

/// A level as written in a level document, before validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawLevel {
    /// The `N` in `levels[N]`.
    pub index: usize,
    pub edges: String,
    pub max_values: String,
    pub carry_limit: String,
    pub moves: String,
}

impl RawLevel {
    /// Parses and validates the record into a [`Level`].
    pub fn to_level(&self) -> Result<Level, ParseError> {
        parse_level(&self.edges, &self.max_values, &self.carry_limit, &self.moves)
    }
}

/// Pulls every level record out of a document, e.g. the script block of a web page.
///
/// Records whose index does not fit a `usize` are skipped with a warning.
///
/// # Examples
/// ```
/// use gather_solver::utils::extract_levels;
/// let doc = r#"levels[0] = "1-2,2-3\n" +
///                 "0,4,6\n" +
///                 "1\n" +
///                 "12\n" +"#;
/// let levels = extract_levels(doc);
/// assert_eq!(levels.len(), 1);
/// assert_eq!(levels[0].edges, "1-2,2-3");
/// assert_eq!(levels[0].moves, "12");
/// ```
pub fn extract_levels(document: &str) -> Vec<RawLevel> {
    level_pattern()
        .captures_iter(document)
        .filter_map(|caps| {
            let index = match caps[1].parse() {
                Ok(index) => index,
                Err(_) => {
                    warn!(index = &caps[1], "skipping level with unusable index");
                    return None;
                }
            };
            Some(RawLevel {
                index,
                edges: caps[2].to_string(),
                max_values: caps[3].to_string(),
                carry_limit: caps[4].to_string(),
                moves: caps[5].to_string(),
            })
        })
        .collect()
}

/// Parses the compact edge notation into 0-indexed [`EdgeSpec`]s.
///
/// Tokens are comma separated and use 1-indexed node numbers:
/// - `i-j`: undirected edge
/// - `i->j`: directed edge from `i` to `j`
/// - `...|>K` / `...|<K`: the pair only opens while the banked score is above / below `K`
///
/// # Examples
/// ```
/// use gather_solver::level::{Conditional, EdgeSpec};
/// use gather_solver::utils::parse_edges;
/// let edges = parse_edges("1-2,2->3|>50").unwrap();
/// assert_eq!(edges[0], EdgeSpec::undirected(0, 1));
/// assert_eq!(edges[1], EdgeSpec::directed(1, 2).with_conditional(Conditional::greater_than(50)));
/// ```
pub fn parse_edges(s: &str) -> Result<Vec<EdgeSpec>, ParseError> {
    s.split(',').map(|token| parse_edge(token.trim())).collect()
}

fn parse_edge(token: &str) -> Result<EdgeSpec, ParseError> {
    let malformed = |message: &str| ParseError::MalformedEdge {
        token: token.to_string(),
        message: message.to_string(),
    };

    let (pair, clause) = match token.split_once('|') {
        Some((pair, clause)) => (pair, Some(clause.trim())),
        None => (token, None),
    };

    let (mut spec, from, to) = if let Some((from, to)) = pair.split_once("->") {
        (EdgeSpec::directed(0, 0), from, to)
    } else if let Some((from, to)) = pair.split_once('-') {
        (EdgeSpec::undirected(0, 0), from, to)
    } else {
        return Err(malformed("expected 'i-j' or 'i->j'"));
    };
    spec.from = parse_node(from, token)?;
    spec.to = parse_node(to, token)?;

    if let Some(clause) = clause {
        let mut chars = clause.chars();
        let conditional = match chars.next() {
            Some('>') => Conditional::greater_than(parse_number(chars.as_str(), "edge condition")?),
            Some('<') => Conditional::less_than(parse_number(chars.as_str(), "edge condition")?),
            _ => return Err(malformed("condition must start with '>' or '<'")),
        };
        spec.conditional = Some(conditional);
    }

    Ok(spec)
}

fn parse_node(text: &str, token: &str) -> Result<usize, ParseError> {
    let node: usize = parse_number(text, "edge")?;
    node.checked_sub(1).ok_or_else(|| ParseError::ZeroNode {
        token: token.to_string(),
    })
}

fn parse_number<T: std::str::FromStr>(text: &str, field: &'static str) -> Result<T, ParseError> {
    text.trim().parse().map_err(|_| ParseError::InvalidNumber {
        text: text.to_string(),
        field,
    })
}

/// Parses a comma-separated list of node capacities, one per node in order.
pub fn parse_max_values(s: &str) -> Result<Vec<Value>, ParseError> {
    s.split(',')
        .map(|v| parse_number(v, "max values"))
        .collect()
}

/// Parses a level from its four textual fields.
///
/// The node count is the number of max values.
pub fn parse_level(
    edges: &str,
    max_values: &str,
    carry_limit: &str,
    moves: &str,
) -> Result<Level, ParseError> {
    let edges = parse_edges(edges)?;
    let max_values = parse_max_values(max_values)?;
    let carry_limit = parse_number(carry_limit, "carry limit")?;
    let moves = parse_number(moves, "moves")?;
    Ok(Level::build(
        max_values.len(),
        &edges,
        max_values,
        carry_limit,
        moves,
    )?)
}

/// Parses a JSON array of [`LevelSpec`] records and validates each into a [`Level`].
///
/// Nodes are 0-indexed here, unlike the compact notation. Each level is validated on its
/// own, so one bad record does not hide the others.
///
/// # Errors
/// [`ParseError::InvalidSpec`] if the document is not a JSON array of level specs.
///
/// # Examples
/// ```
/// use gather_solver::utils::parse_level_specs;
/// let json = r#"[{"node_count": 2, "edges": [{"from": 0, "to": 1}],
///                 "max_values": [0, 5], "carry_limit": 1, "moves": 4}]"#;
/// let levels = parse_level_specs(json).unwrap();
/// assert_eq!(levels[0].as_ref().unwrap().home(), 0);
/// ```
pub fn parse_level_specs(json: &str) -> Result<Vec<Result<Level, ParseError>>, ParseError> {
    let specs: Vec<LevelSpec> =
        serde_json::from_str(json).map_err(|e| ParseError::InvalidSpec {
            message: e.to_string(),
        })?;
    Ok(specs
        .iter()
        .map(|spec| Level::from_spec(spec).map_err(ParseError::from))
        .collect())
}
