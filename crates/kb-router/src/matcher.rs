//! Compiled route table and path matching

use std::collections::HashMap;
use std::sync::Arc;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::guard::NavigationGuard;
use crate::location::{split_segments, Params};
use crate::record::{Redirect, RouteRecord, View};
use crate::router::NavigationError;

const STATIC_SCORE: u32 = 3;
const PARAM_SCORE: u32 = 2;

/// Characters escaped in a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Index of a compiled route in its table
pub type RouteId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A route record flattened with its absolute path
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub id: RouteId,
    pub parent: Option<RouteId>,
    pub depth: usize,
    pub full_path: String,
    pub name: Option<String>,
    pub view: Option<View>,
    pub redirect: Option<Redirect>,
    pub guards: Vec<Arc<dyn NavigationGuard>>,
    segments: Vec<Segment>,
}

impl CompiledRoute {
    fn score(&self) -> u32 {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Static(_) => STATIC_SCORE,
                Segment::Param(_) => PARAM_SCORE,
            })
            .sum()
    }

    fn matches(&self, segments: &[&str]) -> Option<Params> {
        if segments.len() != self.segments.len() {
            return None;
        }
        let mut params = Params::new();
        for (pattern, actual) in self.segments.iter().zip(segments) {
            match pattern {
                Segment::Static(expected) if expected == actual => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    let value = percent_decode_str(actual).decode_utf8().ok()?;
                    params.insert(name.clone(), value.into_owned());
                }
            }
        }
        Some(params)
    }
}

/// All routes of an application, flattened depth-first
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    by_name: HashMap<String, RouteId>,
}

impl RouteTable {
    pub fn compile(records: Vec<RouteRecord>) -> Result<Self, NavigationError> {
        let mut table = Self::default();
        for record in records {
            table.add(record, None, "")?;
        }
        Ok(table)
    }

    fn add(
        &mut self,
        record: RouteRecord,
        parent: Option<RouteId>,
        parent_path: &str,
    ) -> Result<(), NavigationError> {
        let full_path = join_paths(parent_path, &record.path);
        let id = self.routes.len();

        if let Some(name) = &record.name {
            if self.by_name.insert(name.clone(), id).is_some() {
                return Err(NavigationError::DuplicateName(name.clone()));
            }
        }

        let depth = parent.map(|p| self.routes[p].depth + 1).unwrap_or(0);
        let segments = split_segments(&full_path)
            .into_iter()
            .map(|s| match s.strip_prefix(':') {
                Some(param) => Segment::Param(param.to_string()),
                None => Segment::Static(s.to_string()),
            })
            .collect();

        self.routes.push(CompiledRoute {
            id,
            parent,
            depth,
            full_path: full_path.clone(),
            name: record.name,
            view: record.view,
            redirect: record.redirect,
            guards: record.guards,
            segments,
        });

        for child in record.children {
            self.add(child, Some(id), &full_path)?;
        }
        Ok(())
    }

    pub fn get(&self, id: RouteId) -> Option<&CompiledRoute> {
        self.routes.get(id)
    }

    pub fn by_name(&self, name: &str) -> Option<&CompiledRoute> {
        self.by_name.get(name).and_then(|id| self.routes.get(*id))
    }

    /// Best match for a path: highest segment score, then deepest record
    pub fn match_path(&self, path: &str) -> Option<(&CompiledRoute, Params)> {
        let segments = split_segments(path);
        self.routes
            .iter()
            .filter_map(|route| route.matches(&segments).map(|params| (route, params)))
            .max_by(|(a, _), (b, _)| {
                (a.score(), a.depth)
                    .cmp(&(b.score(), b.depth))
                    // Earlier declarations win ties
                    .then(b.id.cmp(&a.id))
            })
    }

    /// Route ids from the root record down to `id`
    pub fn chain(&self, id: RouteId) -> Vec<RouteId> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.routes.get(current).and_then(|r| r.parent);
        }
        chain.reverse();
        chain
    }

    /// Fill a route's `:params` to produce a concrete path
    pub fn build_path(&self, route: &CompiledRoute, params: &Params) -> Result<String, NavigationError> {
        let mut path = String::new();
        for segment in &route.segments {
            path.push('/');
            match segment {
                Segment::Static(s) => path.push_str(s),
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| NavigationError::MissingParam {
                            route: route.name.clone().unwrap_or_else(|| route.full_path.clone()),
                            param: name.clone(),
                        })?;
                    path.extend(utf8_percent_encode(value, SEGMENT));
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }

    /// Only the params a route declares
    pub fn params_for(&self, route: &CompiledRoute, params: &Params) -> Params {
        route
            .segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) => params.get(name).map(|v| (name.clone(), v.clone())),
                Segment::Static(_) => None,
            })
            .collect()
    }
}

fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') || parent.is_empty() {
        return child.to_string();
    }
    if child.is_empty() {
        return parent.to_string();
    }
    format!("{}/{}", parent.trim_end_matches('/'), child)
}
