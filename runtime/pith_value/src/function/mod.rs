//! Function values, parameter specifications and call-site arguments.
//!
//! A `ParameterSpec` is built once per function definition and validated
//! then. Default values are evaluated at definition time and stored as
//! `DefaultValue::Shared`: every call that falls back to the default gets a
//! handle to the *same* value. A default list or mapping mutated by one call
//! is therefore seen by the next. This aliasing is part of the language
//! contract; callers that want a new value per call use
//! `DefaultValue::Fresh`.

use std::fmt;

use rustc_hash::FxHashSet;

use pith_ir::{Name, StringLookup};

use crate::object::AttributeMap;
use crate::value::Value;

/// Opaque handle to an executable body owned by the runtime.
///
/// Function values do not carry code; the runtime resolves the handle when
/// the function is called.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BodyId(u32);

impl BodyId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        BodyId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a parameter receives its value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// Filled by position or by keyword.
    PositionalOrKeyword,
    /// Collects overflow positional arguments into a tuple (`*args`).
    VarPositional,
    /// Filled by keyword only; declared after the variadic collector.
    KeywordOnly,
    /// Collects unconsumed keyword arguments into a mapping (`**kwargs`).
    VarKeyword,
}

/// Constructor for a per-call default.
pub type DefaultFactory = fn() -> Value;

/// Default value attached to a parameter.
#[derive(Clone, Debug)]
pub enum DefaultValue {
    /// Evaluated once at definition time and shared by every call.
    Shared(Value),
    /// Constructed anew for every call that needs it.
    Fresh(DefaultFactory),
}

impl DefaultValue {
    /// The value a call binds when the argument is omitted.
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Shared(value) => value.clone(),
            DefaultValue::Fresh(factory) => factory(),
        }
    }
}

/// A declared parameter.
#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: Name,
    pub kind: ParamKind,
    pub default: Option<DefaultValue>,
}

impl Parameter {
    pub fn positional(name: Name) -> Self {
        Self::of_kind(name, ParamKind::PositionalOrKeyword)
    }

    pub fn variadic(name: Name) -> Self {
        Self::of_kind(name, ParamKind::VarPositional)
    }

    pub fn keyword_only(name: Name) -> Self {
        Self::of_kind(name, ParamKind::KeywordOnly)
    }

    pub fn keyword_collector(name: Name) -> Self {
        Self::of_kind(name, ParamKind::VarKeyword)
    }

    fn of_kind(name: Name, kind: ParamKind) -> Self {
        Parameter {
            name,
            kind,
            default: None,
        }
    }

    /// Attach a definition-time default, shared across calls.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Shared(value));
        self
    }

    /// Attach a default constructed per call.
    #[must_use]
    pub fn with_fresh_default(mut self, factory: DefaultFactory) -> Self {
        self.default = Some(DefaultValue::Fresh(factory));
        self
    }

    #[inline]
    pub fn is_collector(&self) -> bool {
        matches!(self.kind, ParamKind::VarPositional | ParamKind::VarKeyword)
    }
}

/// Rejected parameter declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecError {
    DuplicateParameter { name: Name },
    MultipleVariadic { name: Name },
    MultipleKeywordCollectors { name: Name },
    /// Anything declared after the keyword collector.
    AfterKeywordCollector { name: Name },
    /// A positional-or-keyword parameter after `*args` or a keyword-only one.
    PositionalAfterVariadic { name: Name },
    /// A keyword-only parameter declared before the variadic collector.
    KeywordOnlyBeforeVariadic { name: Name },
    /// A required positional parameter after one with a default.
    NonDefaultAfterDefault { name: Name },
    CollectorWithDefault { name: Name },
}

impl SpecError {
    pub fn parameter(&self) -> Name {
        match self {
            SpecError::DuplicateParameter { name }
            | SpecError::MultipleVariadic { name }
            | SpecError::MultipleKeywordCollectors { name }
            | SpecError::AfterKeywordCollector { name }
            | SpecError::PositionalAfterVariadic { name }
            | SpecError::KeywordOnlyBeforeVariadic { name }
            | SpecError::NonDefaultAfterDefault { name }
            | SpecError::CollectorWithDefault { name } => *name,
        }
    }

    /// Human-readable reason, resolving the parameter name.
    pub fn describe(&self, names: &dyn StringLookup) -> String {
        let name = names.lookup(self.parameter());
        match self {
            SpecError::DuplicateParameter { .. } => {
                format!("duplicate parameter '{name}'")
            }
            SpecError::MultipleVariadic { .. } => {
                format!("second variadic parameter '*{name}'")
            }
            SpecError::MultipleKeywordCollectors { .. } => {
                format!("second keyword collector '**{name}'")
            }
            SpecError::AfterKeywordCollector { .. } => {
                format!("parameter '{name}' follows the keyword collector")
            }
            SpecError::PositionalAfterVariadic { .. } => {
                format!("positional parameter '{name}' follows the variadic parameter")
            }
            SpecError::KeywordOnlyBeforeVariadic { .. } => {
                format!("keyword-only parameter '{name}' precedes the variadic parameter")
            }
            SpecError::NonDefaultAfterDefault { .. } => {
                format!("non-default parameter '{name}' follows default parameter")
            }
            SpecError::CollectorWithDefault { .. } => {
                format!("collector parameter '{name}' cannot have a default")
            }
        }
    }
}

/// Validated parameter list of a function.
///
/// Positional-or-keyword parameters always form a prefix of `params`.
#[derive(Clone, Debug, Default)]
pub struct ParameterSpec {
    params: Vec<Parameter>,
    positional_count: usize,
    variadic: Option<usize>,
    keyword_collector: Option<usize>,
}

impl ParameterSpec {
    /// Validate and build a spec from declaration-ordered parameters.
    pub fn new(params: Vec<Parameter>) -> Result<Self, SpecError> {
        let mut seen = FxHashSet::default();
        let mut positional_count = 0;
        let mut variadic = None;
        let mut keyword_collector = None;
        let mut saw_default = false;
        let mut saw_keyword_only = false;

        for (i, param) in params.iter().enumerate() {
            let name = param.name;
            if !seen.insert(name) {
                return Err(SpecError::DuplicateParameter { name });
            }
            if keyword_collector.is_some() {
                return Err(if param.kind == ParamKind::VarKeyword {
                    SpecError::MultipleKeywordCollectors { name }
                } else {
                    SpecError::AfterKeywordCollector { name }
                });
            }
            if param.is_collector() && param.default.is_some() {
                return Err(SpecError::CollectorWithDefault { name });
            }

            match param.kind {
                ParamKind::PositionalOrKeyword => {
                    if variadic.is_some() || saw_keyword_only {
                        return Err(SpecError::PositionalAfterVariadic { name });
                    }
                    if param.default.is_some() {
                        saw_default = true;
                    } else if saw_default {
                        return Err(SpecError::NonDefaultAfterDefault { name });
                    }
                    positional_count += 1;
                }
                ParamKind::VarPositional => {
                    if variadic.is_some() {
                        return Err(SpecError::MultipleVariadic { name });
                    }
                    if saw_keyword_only {
                        return Err(SpecError::KeywordOnlyBeforeVariadic { name });
                    }
                    variadic = Some(i);
                }
                ParamKind::KeywordOnly => saw_keyword_only = true,
                ParamKind::VarKeyword => keyword_collector = Some(i),
            }
        }

        Ok(ParameterSpec {
            params,
            positional_count,
            variadic,
            keyword_collector,
        })
    }

    /// Spec of a function without parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All parameters in declaration order.
    #[inline]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// The positional-or-keyword prefix.
    #[inline]
    pub fn positional(&self) -> &[Parameter] {
        &self.params[..self.positional_count]
    }

    pub fn variadic(&self) -> Option<&Parameter> {
        self.variadic.map(|i| &self.params[i])
    }

    pub fn keyword_collector(&self) -> Option<&Parameter> {
        self.keyword_collector.map(|i| &self.params[i])
    }

    pub fn keyword_only(&self) -> impl Iterator<Item = &Parameter> {
        self.params
            .iter()
            .filter(|p| p.kind == ParamKind::KeywordOnly)
    }

    /// Index of a parameter by name.
    pub fn position_of(&self, name: Name) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Positional-or-keyword parameters without a default.
    pub fn required_positional_count(&self) -> usize {
        self.positional()
            .iter()
            .filter(|p| p.default.is_none())
            .count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Fully evaluated arguments of one call site.
#[derive(Clone, Debug, Default)]
pub struct CallArguments {
    pub positional: Vec<Value>,
    /// Keyword arguments in call-site order.
    pub keywords: Vec<(Name, Value)>,
}

impl CallArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments with positional values only.
    pub fn positional(values: Vec<Value>) -> Self {
        CallArguments {
            positional: values,
            keywords: Vec::new(),
        }
    }

    /// Add a keyword argument.
    #[must_use]
    pub fn with_keyword(mut self, name: Name, value: Value) -> Self {
        self.keywords.push((name, value));
        self
    }

    /// Prepend a receiver, as a bound method call does.
    #[must_use]
    pub fn with_receiver(mut self, receiver: Value) -> Self {
        self.positional.insert(0, receiver);
        self
    }

    #[inline]
    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }
}

impl From<Vec<Value>> for CallArguments {
    fn from(values: Vec<Value>) -> Self {
        CallArguments::positional(values)
    }
}

/// Name-to-value binding produced by the call binder, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundArguments {
    slots: Vec<(Name, Value)>,
}

impl BoundArguments {
    pub fn with_capacity(capacity: usize) -> Self {
        BoundArguments {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Append a binding. The binder calls this in declaration order.
    pub fn push(&mut self, name: Name, value: Value) {
        self.slots.push((name, value));
    }

    pub fn get(&self, name: Name) -> Option<&Value> {
        self.slots.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: Name) -> bool {
        self.slots.iter().any(|(n, _)| *n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &Value)> {
        self.slots.iter().map(|(n, v)| (*n, v))
    }

    pub fn names(&self) -> Vec<Name> {
        self.slots.iter().map(|(n, _)| *n).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl IntoIterator for BoundArguments {
    type Item = (Name, Value);
    type IntoIter = std::vec::IntoIter<(Name, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

/// User-defined function.
#[derive(Debug)]
pub struct FunctionValue {
    name: Name,
    spec: ParameterSpec,
    /// Leading literal text block of the definition, kept verbatim.
    doc: Option<String>,
    body: BodyId,
    attrs: AttributeMap,
}

impl FunctionValue {
    pub fn new(name: Name, spec: ParameterSpec, doc: Option<String>, body: BodyId) -> Self {
        FunctionValue {
            name,
            spec,
            doc,
            body,
            attrs: AttributeMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    #[inline]
    pub fn spec(&self) -> &ParameterSpec {
        &self.spec
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    #[inline]
    pub fn body(&self) -> BodyId {
        self.body
    }

    #[inline]
    pub fn attrs(&self) -> &AttributeMap {
        &self.attrs
    }
}

/// Built-in function implemented by the runtime.
///
/// Natives take positional arguments only. `arity` counts the receiver for
/// methods; `None` accepts any count.
#[derive(Copy, Clone, Debug)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: Option<usize>,
    pub doc: Option<&'static str>,
    pub body: BodyId,
}

/// Method bound to its receiver.
#[derive(Debug)]
pub struct BoundMethod {
    pub receiver: Value,
    pub method: Value,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::PositionalOrKeyword => write!(f, "positional-or-keyword"),
            ParamKind::VarPositional => write!(f, "variadic"),
            ParamKind::KeywordOnly => write!(f, "keyword-only"),
            ParamKind::VarKeyword => write!(f, "keyword collector"),
        }
    }
}
