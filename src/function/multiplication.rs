use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{Evaluate, Function, FunctionTag, Piecewise, Polynomial, Product, RealFunction};

/// Specialised multiplication. Receives the table so that products of
/// sub-functions dispatch through the same registrations.
pub type MultiplyFn = fn(&MultiplicationTable, &Function, &Function) -> Function;

/// Registry of multiplication fast paths keyed on function tags.
///
/// Lookup order:
/// 1. `(tag(f), tag(g))` in the specific-specific table,
/// 2. `(tag(g), tag(f))`, invoked with swapped arguments,
/// 3. `tag(f)` then `tag(g)` in the specific-generic table,
/// 4. otherwise a lazy generic product `f(x)·g(x)`.
#[derive(Debug, Clone)]
pub struct MultiplicationTable {
    specific: HashMap<(FunctionTag, FunctionTag), MultiplyFn>,
    generic: HashMap<FunctionTag, MultiplyFn>,
}

static DEFAULT_TABLE: Lazy<MultiplicationTable> = Lazy::new(MultiplicationTable::default);

/// Multiply through the process-wide default table.
pub fn multiply(f: &Function, g: &Function) -> Function {
    DEFAULT_TABLE.multiply(f, g)
}

impl Default for MultiplicationTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register_specific(FunctionTag::Polynomial, FunctionTag::Polynomial, polynomial_polynomial);
        table.register_specific(FunctionTag::Piecewise, FunctionTag::Piecewise, piecewise_piecewise);
        table.register_generic(FunctionTag::Piecewise, piecewise_generic);
        table
    }
}

impl MultiplicationTable {
    /// A table without any fast path: every product is lazy.
    pub fn empty() -> Self {
        Self { specific: HashMap::new(), generic: HashMap::new() }
    }

    pub fn register_specific(&mut self, first: FunctionTag, second: FunctionTag, f: MultiplyFn) {
        self.specific.insert((first, second), f);
    }

    pub fn register_generic(&mut self, tag: FunctionTag, f: MultiplyFn) {
        self.generic.insert(tag, f);
    }

    pub fn multiply(&self, f: &Function, g: &Function) -> Function {
        let (tf, tg) = (f.tag(), g.tag());
        if let Some(mult) = self.specific.get(&(tf, tg)) {
            return mult(self, f, g);
        }
        if let Some(mult) = self.specific.get(&(tg, tf)) {
            return mult(self, g, f);
        }
        if let Some(mult) = self.generic.get(&tf) {
            return mult(self, f, g);
        }
        if let Some(mult) = self.generic.get(&tg) {
            return mult(self, g, f);
        }
        Product::function(f, g)
    }
}

fn polynomial_polynomial(_: &MultiplicationTable, f: &Function, g: &Function) -> Function {
    match (f, g) {
        (Function::Polynomial(p), Function::Polynomial(q)) => Function::Polynomial(p.multiply(q)),
        _ => Product::function(f, g),
    }
}

/// Same knots, every sub-function multiplied by the other operand.
fn piecewise_generic(table: &MultiplicationTable, f: &Function, g: &Function) -> Function {
    let Function::Piecewise(piecewise) = f else {
        return Product::function(f, g);
    };
    let functions = piecewise
        .functions()
        .iter()
        .map(|sub| table.multiply(sub, g))
        .collect();
    match Piecewise::new(piecewise.knots().to_vec(), functions) {
        Ok(product) => Function::Piecewise(product.with_extrapolation(piecewise.is_extrapolating())),
        Err(_) => Product::function(f, g),
    }
}

/// Product on the intersection of both supports; zero when they are disjoint.
fn piecewise_piecewise(table: &MultiplicationTable, f: &Function, g: &Function) -> Function {
    let (Function::Piecewise(p), Function::Piecewise(q)) = (f, g) else {
        return Product::function(f, g);
    };
    // Unbounded supports have no finite intersection to build knots on.
    if p.is_extrapolating() || q.is_extrapolating() {
        return Product::function(f, g);
    }

    let (p_lo, p_hi) = p.range();
    let (q_lo, q_hi) = q.range();
    if p_hi <= q_lo || q_hi <= p_lo {
        return Function::Polynomial(Polynomial::zero());
    }
    let lo = p_lo.max(q_lo);
    let hi = p_hi.min(q_hi);

    let mut knots: Vec<f64> = p
        .knots()
        .iter()
        .chain(q.knots())
        .copied()
        .filter(|&k| lo < k && k < hi)
        .collect();
    knots.push(lo);
    knots.push(hi);
    knots.sort_by(f64::total_cmp);
    knots.dedup();

    let functions: Option<Vec<Function>> = knots
        .windows(2)
        .map(|w| match *w {
            [a, b] => {
                let mid = 0.5 * (a + b);
                let sub_p = p.function_covering(mid)?;
                let sub_q = q.function_covering(mid)?;
                Some(table.multiply(sub_p, sub_q))
            }
            _ => None,
        })
        .collect();
    let Some(functions) = functions else {
        return Product::function(f, g);
    };

    let product = match Piecewise::new(knots, functions) {
        Ok(product) => product,
        Err(_) => return Product::function(f, g),
    };
    // The operand that continues past `hi` switches sub-function there; a jump
    // at that knot cannot be carried by the product's closing interval.
    let end_value = p.value(hi) * q.value(hi);
    let closing = product.value(hi);
    if (end_value - closing).abs() <= END_TOLERANCE * end_value.abs().max(closing.abs()) {
        Function::Piecewise(product)
    } else {
        Function::generic(ClosedProduct { product, end: hi, end_value })
    }
}

const END_TOLERANCE: f64 = 1e-12;

/// Piecewise product whose final knot takes the operands' own product.
#[derive(Debug)]
struct ClosedProduct {
    product: Piecewise,
    end: f64,
    end_value: f64,
}

impl RealFunction for ClosedProduct {
    fn value(&self, x: f64) -> f64 {
        if x.total_cmp(&self.end).is_eq() {
            self.end_value
        } else {
            self.product.value(x)
        }
    }

    fn integral(&self, a: f64, b: f64) -> Option<f64> {
        self.product.integrate(a, b).ok()
    }
}
