//! Package-scope constant checker.
//!
//! Resolves the type and value of every package-level constant across all
//! files of a package. Constants are evaluated on demand, so references may
//! point forward or into other files; reference cycles are detected.
//!
//! Failures do not abort the check. A constant that cannot be evaluated is
//! left out of the symbol table and recorded as a [`CheckError`].

use crate::ast::{ConstSpec, Decl, Expr, Ident, SourceFile, TypeExpr, TypeSpec};
use crate::constant::{self, ConstValue};
use crate::error::{CheckError, line_col};
use crate::package::{IdentId, Object, SymbolTable};
use crate::token::{Op, Span};
use crate::types::{BasicKind, Type};
use std::collections::HashMap;

const MISSING_INIT: &str = "missing init expr for const declaration";

/// Checks all constants of a package.
///
/// Returns the symbol table and the diagnostics for constants that could
/// not be checked.
///
/// # Examples
///
/// ```
/// use enumschema_loader::checker::check_package;
/// use enumschema_loader::parser::parse_file;
///
/// let file = parse_file("a.go", "package a\nconst (\n\tA = B + 1\n\tB = 2\n)\n").unwrap();
/// let (symbols, diagnostics) = check_package(&[file]);
/// assert_eq!(symbols.len(), 2);
/// assert!(diagnostics.is_empty());
/// ```
#[must_use]
pub fn check_package(files: &[SourceFile]) -> (SymbolTable, Vec<CheckError>) {
    let mut checker = Checker::new(files);
    let mut symbols = SymbolTable::new();
    let mut diagnostics = Vec::new();

    for idx in 0..checker.sites.len() {
        let site = &checker.sites[idx];
        let (file, name) = (site.file, site.name);
        match checker.eval_site(idx) {
            Ok(operand) => symbols.insert(
                IdentId::new(file, name),
                Object {
                    name: name.name.clone(),
                    ty: operand.ty,
                    value: operand.value,
                },
            ),
            Err(message) => {
                let source_file = &files[file];
                let (line, _) = line_col(&source_file.source, name.span.start);
                let diagnostic = CheckError {
                    site: IdentId::new(file, name),
                    file: source_file.name.clone(),
                    line,
                    message,
                };
                tracing::warn!("skipping constant {}: {}", name.name, diagnostic);
                diagnostics.push(diagnostic);
            }
        }
    }

    tracing::debug!(
        "Checked {} constants ({} skipped)",
        symbols.len(),
        diagnostics.len()
    );
    (symbols, diagnostics)
}

/// One declared constant name with the expression that defines it.
#[derive(Debug)]
struct Site<'a> {
    file: usize,
    name: &'a Ident,
    ty: Option<&'a TypeExpr>,
    expr: Option<&'a Expr>,
    iota: usize,
    setup_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct Operand {
    ty: Type,
    value: ConstValue,
}

impl Operand {
    const fn untyped(kind: BasicKind, value: ConstValue) -> Self {
        Self {
            ty: Type::Basic(kind),
            value,
        }
    }

    fn describe(&self) -> String {
        if self.ty.is_untyped() {
            format!("{} ({} constant)", self.value, self.ty)
        } else {
            format!("{} (constant of type {})", self.value, self.ty)
        }
    }
}

#[derive(Debug)]
enum State {
    Pending,
    Active,
    Done(Result<Operand, String>),
}

struct Checker<'a> {
    files: &'a [SourceFile],
    sites: Vec<Site<'a>>,
    consts: HashMap<&'a str, usize>,
    types: HashMap<&'a str, (usize, &'a TypeSpec)>,
    states: Vec<State>,
}

impl<'a> Checker<'a> {
    fn new(files: &'a [SourceFile]) -> Self {
        let mut checker = Self {
            files,
            sites: Vec::new(),
            consts: HashMap::new(),
            types: HashMap::new(),
            states: Vec::new(),
        };

        for (file_idx, file) in files.iter().enumerate() {
            for decl in &file.decls {
                match decl {
                    Decl::Const(decl) => checker.collect_consts(file_idx, &decl.specs),
                    Decl::Type(specs) => {
                        for spec in specs {
                            checker
                                .types
                                .entry(spec.name.name.as_str())
                                .or_insert((file_idx, spec));
                        }
                    }
                }
            }
        }

        checker.states = checker.sites.iter().map(|_| State::Pending).collect();
        checker
    }

    /// Expands one const declaration into sites, applying implicit
    /// repetition of the previous expression list.
    fn collect_consts(&mut self, file: usize, specs: &'a [ConstSpec]) {
        let mut previous: Option<(Option<&'a TypeExpr>, &'a [Expr])> = None;

        for spec in specs {
            let (ty, values, mut error) = if !spec.values.is_empty() {
                previous = Some((spec.ty.as_ref(), spec.values.as_slice()));
                (spec.ty.as_ref(), spec.values.as_slice(), None)
            } else if spec.ty.is_some() {
                (spec.ty.as_ref(), &[][..], Some(MISSING_INIT.to_string()))
            } else if let Some((ty, values)) = previous {
                (ty, values, None)
            } else {
                (None, &[][..], Some(MISSING_INIT.to_string()))
            };

            if error.is_none() && values.len() > spec.names.len() {
                error = Some("extra init expr".to_string());
            }

            for (i, name) in spec.names.iter().enumerate() {
                if name.is_blank() {
                    continue;
                }

                let mut setup_error = error.clone();
                if setup_error.is_none() && values.get(i).is_none() {
                    setup_error = Some(MISSING_INIT.to_string());
                }
                if self.consts.contains_key(name.name.as_str()) {
                    setup_error = Some(format!("{} redeclared in this block", name.name));
                } else {
                    self.consts.insert(name.name.as_str(), self.sites.len());
                }

                self.sites.push(Site {
                    file,
                    name,
                    ty,
                    expr: values.get(i),
                    iota: spec.iota,
                    setup_error,
                });
            }
        }
    }

    fn text(&self, file: usize, span: Span) -> &'a str {
        let files: &'a [SourceFile] = self.files;
        files[file]
            .source
            .get(span.start..span.end)
            .unwrap_or_default()
    }

    fn eval_site(&mut self, idx: usize) -> Result<Operand, String> {
        match &self.states[idx] {
            State::Done(result) => return result.clone(),
            State::Active => {
                return Err(format!(
                    "initialization cycle: {} refers to itself",
                    self.sites[idx].name.name
                ));
            }
            State::Pending => {}
        }

        self.states[idx] = State::Active;
        let result = self.check_site(idx);
        self.states[idx] = State::Done(result.clone());
        result
    }

    fn check_site(&mut self, idx: usize) -> Result<Operand, String> {
        let site = &self.sites[idx];
        if let Some(error) = &site.setup_error {
            return Err(error.clone());
        }
        let (file, ty, iota) = (site.file, site.ty, site.iota);
        let expr = site.expr.ok_or_else(|| MISSING_INIT.to_string())?;

        let operand = self.eval_expr(expr, file, iota)?;
        let Some(ty) = ty else {
            return Ok(operand);
        };

        let target = self.resolve_type_expr(ty, file, &mut Vec::new())?;
        if target.underlying().is_none() {
            return Err(format!("invalid constant type {target}"));
        }
        assign(operand, &target)
    }

    fn eval_expr(&mut self, expr: &Expr, file: usize, iota: usize) -> Result<Operand, String> {
        match expr {
            Expr::Int { text, .. } => Ok(Operand::untyped(
                BasicKind::UntypedInt,
                ConstValue::Int(constant::parse_int_literal(text)?),
            )),
            Expr::Float { text, .. } => Ok(Operand::untyped(
                BasicKind::UntypedFloat,
                ConstValue::Float(constant::parse_float_literal(text)?),
            )),
            Expr::Imag { text, .. } => Err(format!("complex constant {text} is not supported")),
            Expr::Rune { value, .. } => Ok(Operand::untyped(
                BasicKind::UntypedRune,
                ConstValue::Int(i128::from(*value)),
            )),
            Expr::Str { value, .. } => Ok(Operand::untyped(
                BasicKind::UntypedString,
                ConstValue::String(value.clone()),
            )),
            Expr::Ident(ident) => self.eval_ident(ident, iota),
            Expr::Paren { inner, .. } => self.eval_expr(inner, file, iota),
            Expr::Unary { op, operand, .. } => {
                let x = self.eval_expr(operand, file, iota)?;
                unary(*op, x)
            }
            Expr::Binary { op, lhs, rhs } => {
                let x = self.eval_expr(lhs, file, iota)?;
                let y = self.eval_expr(rhs, file, iota)?;
                binary(*op, x, y)
            }
            Expr::Call { func, args, span } => self.eval_call(func, args, *span, file, iota),
            Expr::Selector { .. } => Err(format!(
                "cannot resolve {}: imported packages are not loaded",
                self.text(file, expr.span())
            )),
            Expr::Unsupported(span) => {
                Err(format!("{} is not constant", self.text(file, *span)))
            }
        }
    }

    fn eval_ident(&mut self, ident: &Ident, iota: usize) -> Result<Operand, String> {
        if let Some(&idx) = self.consts.get(ident.name.as_str()) {
            return self.eval_site(idx);
        }

        match ident.name.as_str() {
            "iota" => {
                let iota = i128::try_from(iota).map_err(|_| "iota overflows".to_string())?;
                Ok(Operand::untyped(BasicKind::UntypedInt, ConstValue::Int(iota)))
            }
            "true" | "false" => Ok(Operand::untyped(
                BasicKind::UntypedBool,
                ConstValue::Bool(ident.name == "true"),
            )),
            "nil" => Err("use of untyped nil in constant declaration".to_string()),
            name if self.types.contains_key(name) || BasicKind::from_name(name).is_some() => {
                Err(format!("{name} (type) is not an expression"))
            }
            name => Err(format!("undefined: {name}")),
        }
    }

    fn eval_call(
        &mut self,
        func: &Expr,
        args: &[Expr],
        span: Span,
        file: usize,
        iota: usize,
    ) -> Result<Operand, String> {
        let mut callee = func;
        while let Expr::Paren { inner, .. } = callee {
            callee = inner;
        }

        if let Expr::Ident(ident) = callee {
            let shadowed = self.consts.contains_key(ident.name.as_str())
                || self.types.contains_key(ident.name.as_str());
            if ident.name == "len" && !shadowed {
                return self.eval_len(args, file, iota);
            }

            if let Some(target) = self.lookup_type(&ident.name, &mut Vec::new())? {
                let [arg] = args else {
                    return Err(format!(
                        "wrong argument count in conversion to {target}"
                    ));
                };
                let x = self.eval_expr(arg, file, iota)?;
                return convert(x, &target);
            }
        }

        Err(format!("{} is not constant", self.text(file, span)))
    }

    fn eval_len(&mut self, args: &[Expr], file: usize, iota: usize) -> Result<Operand, String> {
        let [arg] = args else {
            return Err("wrong argument count for len".to_string());
        };
        match self.eval_expr(arg, file, iota)? {
            Operand {
                value: ConstValue::String(s),
                ..
            } => {
                let len = i128::try_from(s.len()).map_err(|_| "string too long".to_string())?;
                Ok(Operand {
                    ty: Type::Basic(BasicKind::Int),
                    value: ConstValue::Int(len),
                })
            }
            other => Err(format!(
                "invalid argument: len({}) is not constant",
                other.describe()
            )),
        }
    }

    /// Resolves a type name declared in the package or predeclared.
    fn lookup_type(
        &self,
        name: &str,
        visiting: &mut Vec<&'a str>,
    ) -> Result<Option<Type>, String> {
        let Some(&(file, spec)) = self.types.get(name) else {
            return Ok(BasicKind::from_name(name).map(Type::Basic));
        };

        let declared = spec.name.name.as_str();
        if visiting.contains(&declared) {
            return Err(format!("invalid recursive type {declared}"));
        }
        visiting.push(declared);
        let resolved = self.resolve_type_expr(&spec.ty, file, visiting);
        visiting.pop();
        let resolved = resolved?;

        Ok(Some(if spec.alias {
            resolved
        } else {
            Type::Named {
                name: declared.to_string(),
                underlying: resolved.underlying(),
            }
        }))
    }

    fn resolve_type_expr(
        &self,
        expr: &TypeExpr,
        file: usize,
        visiting: &mut Vec<&'a str>,
    ) -> Result<Type, String> {
        match expr {
            TypeExpr::Name(ident) => self.lookup_type(&ident.name, visiting)?.ok_or_else(|| {
                if self.consts.contains_key(ident.name.as_str()) {
                    format!("{} is not a type", ident.name)
                } else {
                    format!("undefined: {}", ident.name)
                }
            }),
            TypeExpr::Qualified { package, name } => Ok(Type::Named {
                name: format!("{}.{}", package.name, name.name),
                underlying: None,
            }),
            TypeExpr::Other(span) => Ok(Type::Named {
                name: self.text(file, *span).to_string(),
                underlying: None,
            }),
        }
    }
}

/// Checks that an integer value fits its typed integer type.
fn representable(x: Operand) -> Result<Operand, String> {
    if let (Some((min, max)), ConstValue::Int(v)) =
        (x.ty.underlying().and_then(BasicKind::int_range), &x.value)
    {
        if *v < min || *v > max {
            return Err(format!("constant {v} overflows {}", x.ty));
        }
    }
    Ok(x)
}

/// Implicit conversion of a constant to a declared type.
fn assign(x: Operand, target: &Type) -> Result<Operand, String> {
    if !x.ty.is_untyped() {
        if &x.ty == target {
            return Ok(x);
        }
        return Err(format!("cannot use {} as {target} value", x.describe()));
    }

    let Some(kind) = target.underlying() else {
        return Err(format!("invalid constant type {target}"));
    };

    let value = match (&x.value, kind) {
        (ConstValue::Int(v), k) if k.is_integer() => ConstValue::Int(*v),
        (ConstValue::Float(_), k) if k.is_integer() => {
            ConstValue::Int(x.value.to_int().ok_or_else(|| {
                format!("cannot use {} as {target} value (truncated)", x.describe())
            })?)
        }
        (ConstValue::Int(_) | ConstValue::Float(_), k) if k.is_float() => {
            ConstValue::Float(x.value.to_float().unwrap_or_default())
        }
        (ConstValue::String(_), BasicKind::String) | (ConstValue::Bool(_), BasicKind::Bool) => {
            x.value.clone()
        }
        _ => return Err(format!("cannot use {} as {target} value", x.describe())),
    };

    representable(Operand {
        ty: target.clone(),
        value,
    })
}

/// Explicit conversion `T(x)`.
fn convert(x: Operand, target: &Type) -> Result<Operand, String> {
    let Some(kind) = target.underlying() else {
        return Err(format!(
            "cannot convert {} to non-basic type {target}",
            x.describe()
        ));
    };

    let value = match (&x.value, kind) {
        (ConstValue::Int(v), k) if k.is_integer() => ConstValue::Int(*v),
        (ConstValue::Float(_), k) if k.is_integer() => {
            ConstValue::Int(x.value.to_int().ok_or_else(|| {
                format!("cannot convert {} to type {target} (truncated)", x.describe())
            })?)
        }
        (ConstValue::Int(_) | ConstValue::Float(_), k) if k.is_float() => {
            ConstValue::Float(x.value.to_float().unwrap_or_default())
        }
        (ConstValue::Int(v), BasicKind::String) => ConstValue::String(
            u32::try_from(*v)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER)
                .to_string(),
        ),
        (ConstValue::String(_), BasicKind::String) | (ConstValue::Bool(_), BasicKind::Bool) => {
            x.value.clone()
        }
        _ => {
            return Err(format!("cannot convert {} to type {target}", x.describe()));
        }
    };

    representable(Operand {
        ty: target.clone(),
        value,
    })
}

fn unary(op: Op, x: Operand) -> Result<Operand, String> {
    let value = match (op, &x.value) {
        (Op::Add, ConstValue::Int(_) | ConstValue::Float(_)) => x.value.clone(),
        (Op::Sub, ConstValue::Int(v)) => {
            ConstValue::Int(v.checked_neg().ok_or_else(|| "constant overflow".to_string())?)
        }
        (Op::Sub, ConstValue::Float(f)) => ConstValue::Float(-f),
        (Op::Not, ConstValue::Bool(b)) => ConstValue::Bool(!b),
        (Op::Xor, ConstValue::Int(v)) => {
            // Unsigned complement stays within the type's width.
            match x.ty.underlying().filter(|k| k.is_unsigned()).and_then(BasicKind::bits) {
                Some(bits) => ConstValue::Int(!v & ((1i128 << bits) - 1)),
                None => ConstValue::Int(!v),
            }
        }
        _ => {
            return Err(format!(
                "invalid operation: operator {op} not defined on {}",
                x.describe()
            ));
        }
    };

    representable(Operand { ty: x.ty, value })
}

/// Rank of an untyped numeric kind; the larger kind wins in mixed operations.
const fn untyped_rank(kind: BasicKind) -> Option<u8> {
    match kind {
        BasicKind::UntypedInt => Some(1),
        BasicKind::UntypedRune => Some(2),
        BasicKind::UntypedFloat => Some(3),
        _ => None,
    }
}

/// Brings two operands to a common type.
fn unify(x: Operand, y: Operand) -> Result<(Type, ConstValue, ConstValue), String> {
    match (x.ty.is_untyped(), y.ty.is_untyped()) {
        (false, false) => {
            if x.ty != y.ty {
                return Err(format!(
                    "invalid operation: mismatched types {} and {}",
                    x.ty, y.ty
                ));
            }
            Ok((x.ty, x.value, y.value))
        }
        (false, true) => {
            let y = assign(y, &x.ty)?;
            Ok((x.ty, x.value, y.value))
        }
        (true, false) => {
            let x = assign(x, &y.ty)?;
            Ok((y.ty, x.value, y.value))
        }
        (true, true) => {
            let (Some(kx), Some(ky)) = (x.ty.underlying(), y.ty.underlying()) else {
                return Err("invalid operation: untyped operands".to_string());
            };
            match (untyped_rank(kx), untyped_rank(ky)) {
                (Some(rx), Some(ry)) => {
                    let kind = if rx >= ry { kx } else { ky };
                    if kind == BasicKind::UntypedFloat {
                        let fx = x.value.to_float().unwrap_or_default();
                        let fy = y.value.to_float().unwrap_or_default();
                        Ok((
                            Type::Basic(kind),
                            ConstValue::Float(fx),
                            ConstValue::Float(fy),
                        ))
                    } else {
                        Ok((Type::Basic(kind), x.value, y.value))
                    }
                }
                _ if kx == ky => Ok((x.ty, x.value, y.value)),
                _ => Err(format!(
                    "invalid operation: mismatched types {} and {}",
                    x.ty, y.ty
                )),
            }
        }
    }
}

fn binary(op: Op, x: Operand, y: Operand) -> Result<Operand, String> {
    match op {
        Op::Shl | Op::Shr => return shift(op, x, y),
        Op::LAnd | Op::LOr => return logical(op, x, y),
        _ => {}
    }

    let (ty, lhs, rhs) = unify(x, y)?;

    if matches!(op, Op::Eql | Op::Neq | Op::Lss | Op::Leq | Op::Gtr | Op::Geq) {
        let result = match (&lhs, &rhs) {
            (ConstValue::Int(a), ConstValue::Int(b)) => constant::compare(op, a, b),
            (ConstValue::Float(a), ConstValue::Float(b)) => constant::compare(op, a, b),
            (ConstValue::String(a), ConstValue::String(b)) => constant::compare(op, a, b),
            (ConstValue::Bool(a), ConstValue::Bool(b)) if matches!(op, Op::Eql | Op::Neq) => {
                constant::compare(op, a, b)
            }
            _ => None,
        }
        .ok_or_else(|| format!("invalid operation: operator {op} not defined on {ty}"))?;
        return Ok(Operand::untyped(
            BasicKind::UntypedBool,
            ConstValue::Bool(result),
        ));
    }

    let value = match (&lhs, &rhs) {
        (ConstValue::Int(a), ConstValue::Int(b)) => ConstValue::Int(constant::int_binary(op, *a, *b)?),
        (ConstValue::Float(a), ConstValue::Float(b)) => {
            ConstValue::Float(constant::float_binary(op, *a, *b)?)
        }
        (ConstValue::String(a), ConstValue::String(b)) if op == Op::Add => {
            ConstValue::String(format!("{a}{b}"))
        }
        _ => {
            return Err(format!(
                "invalid operation: operator {op} not defined on {ty}"
            ));
        }
    };

    representable(Operand { ty, value })
}

fn logical(op: Op, x: Operand, y: Operand) -> Result<Operand, String> {
    let (ConstValue::Bool(a), ConstValue::Bool(b)) = (&x.value, &y.value) else {
        return Err(format!(
            "invalid operation: operator {op} not defined on {}",
            x.describe()
        ));
    };
    let value = if op == Op::LAnd { *a && *b } else { *a || *b };
    let ty = if x.ty.is_untyped() { y.ty } else { x.ty };
    Ok(Operand {
        ty,
        value: ConstValue::Bool(value),
    })
}

/// Shifts take the type of their left operand.
fn shift(op: Op, x: Operand, y: Operand) -> Result<Operand, String> {
    let count = y
        .value
        .to_int()
        .ok_or_else(|| format!("invalid shift count {}", y.describe()))?;

    let (ty, base) = if x.ty.is_untyped() {
        let base = x.value.to_int().ok_or_else(|| {
            format!(
                "invalid operation: shifted operand {} must be integer",
                x.describe()
            )
        })?;
        let ty = if matches!(x.value, ConstValue::Float(_)) {
            Type::Basic(BasicKind::UntypedInt)
        } else {
            x.ty
        };
        (ty, base)
    } else {
        match (&x.value, x.ty.is_integer()) {
            (ConstValue::Int(v), true) => (x.ty, *v),
            _ => {
                return Err(format!(
                    "invalid operation: shifted operand {} must be integer",
                    x.describe()
                ));
            }
        }
    };

    let value = constant::int_binary(op, base, count)?;
    representable(Operand {
        ty,
        value: ConstValue::Int(value),
    })
}
