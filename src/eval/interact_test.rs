//! Tests for the interaction rules, one program per behaviour.
use super::*;
use crate::builder::Term;
use crate::data::{FunId, Symbols, ROOT};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Symbols used across these programs.
fn symbols() -> Symbols {
    let mut symbols = Symbols::new();
    symbols.declare("Pair", 2).unwrap();
    symbols.declare("Nil", 0).unwrap();
    symbols.declare("F", 1).unwrap();
    symbols.declare("Sum", 1).unwrap();
    symbols
}

/// Sum(0) = 0; Sum(n) = n + Sum(n - 1)
fn sum_rules(sum: FunId) -> RuleTable {
    let mut table = RuleTable::new();
    table.insert(sum, move |rt, host, term| {
        let n = rt.reduce(term.loc(0))?;
        if n.tag() != Tag::U32 {
            return Ok(None);
        }
        let heap = rt.heap_mut();
        if n.num() == 0 {
            heap.free(term.loc(0), 1);
            return Ok(Some(heap.link(host, Link::u32(0))));
        }
        let op = heap.alloc(2)?;
        // The call's own slot holds the next argument.
        heap.link(term.loc(0), Link::u32(n.num() - 1));
        heap.link(op, n);
        heap.link(op + 1, Link::cal(sum, 1, term.loc(0)));
        Ok(Some(heap.link(host, Link::op2(Op::Add, op))))
    });
    table
}

fn pair_fields(rt: &Runtime<'_>) -> (Link, Link) {
    let root = rt.heap().deref(ROOT);
    assert_eq!(root.tag(), Tag::Ctr, "root is {}", root);
    (rt.heap().child(root, 0), rt.heap().child(root, 1))
}

#[test]
fn beta_reduction() {
    init_tracing();
    let mut rt = Runtime::new();
    rt.boot(
        &symbols(),
        &Term::app(Term::lam("x", Term::var("x")), Term::num(42)),
    )
    .unwrap();
    assert_eq!(rt.heap().free_groups(2), 0);

    assert_eq!(rt.reduce(ROOT).unwrap(), Link::u32(42));
    assert_eq!(rt.heap().deref(ROOT), Link::u32(42));
    assert_eq!(rt.interactions(), 1);
    // The application and the lambda.
    assert_eq!(rt.heap().free_groups(2), 2);
}

#[test]
fn unused_argument_is_collected() {
    let mut rt = Runtime::new();
    rt.boot(
        &symbols(),
        &Term::app(Term::lam("x", Term::num(1)), Term::lam("y", Term::var("y"))),
    )
    .unwrap();

    assert_eq!(rt.reduce(ROOT).unwrap(), Link::u32(1));
    assert_eq!(rt.heap().free_groups(2), 3);
}

#[test]
fn arithmetic() {
    for (op, a, b, expected) in [
        (Op::Add, 3, 4, 7),
        (Op::Ltn, 5, 5, 0),
        (Op::Sub, 0, 1, 0xFFFF_FFFF),
        (Op::Div, 9, 0, 0),
        (Op::Shl, 1, 4, 16),
    ] {
        let mut rt = Runtime::new();
        rt.boot(&symbols(), &Term::op2(op, Term::num(a), Term::num(b)))
            .unwrap();
        assert_eq!(rt.reduce(ROOT).unwrap(), Link::u32(expected), "{} {} {}", op, a, b);
        assert_eq!(rt.interactions(), 1);
        assert_eq!(rt.heap().free_groups(2), 1);
    }
}

#[test]
fn operands_are_forced() {
    // (* ((λx x) #6) (+ #3 #4))
    let mut rt = Runtime::new();
    rt.boot(
        &symbols(),
        &Term::op2(
            Op::Mul,
            Term::app(Term::lam("x", Term::var("x")), Term::num(6)),
            Term::op2(Op::Add, Term::num(3), Term::num(4)),
        ),
    )
    .unwrap();
    assert_eq!(rt.reduce(ROOT).unwrap(), Link::u32(42));
    assert_eq!(rt.interactions(), 3);
}

#[test]
fn duplicating_a_number_is_free() {
    init_tracing();
    // !1<a b> = #9; (Pair a b)
    let mut rt = Runtime::new();
    rt.boot(
        &symbols(),
        &Term::dup(
            1,
            "a",
            "b",
            Term::num(9),
            Term::ctr("Pair", vec![Term::var("a"), Term::var("b")]),
        ),
    )
    .unwrap();

    assert_eq!(rt.normal(ROOT).unwrap(), 0);
    assert_eq!(pair_fields(&rt), (Link::u32(9), Link::u32(9)));
    assert_eq!(rt.heap().free_groups(3), 1);
}

#[test]
fn duplicating_a_lambda_is_counted() {
    init_tracing();
    // !1<f g> = λx x; (Pair (f #1) (g #2))
    let mut rt = Runtime::new();
    rt.boot(
        &symbols(),
        &Term::dup(
            1,
            "f",
            "g",
            Term::lam("x", Term::var("x")),
            Term::ctr(
                "Pair",
                vec![
                    Term::app(Term::var("f"), Term::num(1)),
                    Term::app(Term::var("g"), Term::num(2)),
                ],
            ),
        ),
    )
    .unwrap();

    // dup-lam, app-lam, dup-par (same label), app-lam
    assert_eq!(rt.normal(ROOT).unwrap(), 4);
    assert_eq!(pair_fields(&rt), (Link::u32(1), Link::u32(2)));
}

#[test]
fn duplicating_with_a_dead_projection() {
    // !1<a b> = λx x; a
    let mut rt = Runtime::new();
    rt.boot(
        &symbols(),
        &Term::dup(1, "a", "b", Term::lam("x", Term::var("x")), Term::var("a")),
    )
    .unwrap();

    assert_eq!(rt.normal(ROOT).unwrap(), 2);
    let root = rt.heap().deref(ROOT);
    assert_eq!(root.tag(), Tag::Lam);
    assert_eq!(rt.heap().child(root, 1), Link::var(root.loc(0)));
}

#[test]
fn annihilation() {
    // !3<x y> = &3<(λz z) #7>; (Pair x y)
    let mut rt = Runtime::new();
    rt.boot(
        &symbols(),
        &Term::dup(
            3,
            "x",
            "y",
            Term::par(3, Term::lam("z", Term::var("z")), Term::num(7)),
            Term::ctr("Pair", vec![Term::var("x"), Term::var("y")]),
        ),
    )
    .unwrap();
    let slots = rt.heap().current_stats().slots;

    assert_eq!(rt.normal(ROOT).unwrap(), 1);
    let (x, y) = pair_fields(&rt);
    assert_eq!(x.tag(), Tag::Lam);
    assert_eq!(rt.heap().child(x, 1), Link::var(x.loc(0)));
    assert_eq!(y, Link::u32(7));
    // Nothing new was allocated; the duplication and superposition were freed.
    assert_eq!(rt.heap().current_stats().slots, slots);
    assert_eq!(rt.heap().free_groups(3), 1);
    assert_eq!(rt.heap().free_groups(2), 1);
}

#[test]
fn commutation_of_different_labels() {
    // !1<x y> = &2<#1 #2>; (Pair x y)
    let mut rt = Runtime::new();
    rt.boot(
        &symbols(),
        &Term::dup(
            1,
            "x",
            "y",
            Term::par(2, Term::num(1), Term::num(2)),
            Term::ctr("Pair", vec![Term::var("x"), Term::var("y")]),
        ),
    )
    .unwrap();

    assert_eq!(rt.normal(ROOT).unwrap(), 1);
    let (x, y) = pair_fields(&rt);
    for side in [x, y] {
        assert_eq!((side.tag(), side.label()), (Tag::Par, 2));
        assert_eq!(rt.heap().child(side, 0), Link::u32(1));
        assert_eq!(rt.heap().child(side, 1), Link::u32(2));
    }
}

#[test]
fn application_of_superposition() {
    // (&5<(λx x) (λy #0)> #3)
    let mut rt = Runtime::new();
    rt.boot(
        &symbols(),
        &Term::app(
            Term::par(5, Term::lam("x", Term::var("x")), Term::lam("y", Term::num(0))),
            Term::num(3),
        ),
    )
    .unwrap();

    let whnf = rt.reduce(ROOT).unwrap();
    assert_eq!((whnf.tag(), whnf.label()), (Tag::Par, 5));
    assert_eq!(rt.interactions(), 1);

    assert_eq!(rt.normal(ROOT).unwrap(), 2);
    let root = rt.heap().deref(ROOT);
    assert_eq!(rt.heap().child(root, 0), Link::u32(3));
    assert_eq!(rt.heap().child(root, 1), Link::u32(0));
}

#[test]
fn operator_over_superposition() {
    // (+ &1<#1 #2> #10)  and  (- #10 &1<#1 #2>)
    for (term, expected) in [
        (
            Term::op2(Op::Add, Term::par(1, Term::num(1), Term::num(2)), Term::num(10)),
            (11, 12),
        ),
        (
            Term::op2(Op::Sub, Term::num(10), Term::par(1, Term::num(1), Term::num(2))),
            (9, 8),
        ),
    ] {
        let mut rt = Runtime::new();
        rt.boot(&symbols(), &term).unwrap();
        // op2-par, then one op2-u32 per branch; copying #10 is free.
        assert_eq!(rt.normal(ROOT).unwrap(), 3);
        let root = rt.heap().deref(ROOT);
        assert_eq!((root.tag(), root.label()), (Tag::Par, 1));
        assert_eq!(rt.heap().child(root, 0), Link::u32(expected.0));
        assert_eq!(rt.heap().child(root, 1), Link::u32(expected.1));
    }
}

#[test]
fn duplicating_a_constructor() {
    // !4<a b> = (Pair #1 λx x); (Pair a b)
    let symbols = symbols();
    let mut rt = Runtime::new();
    rt.boot(
        &symbols,
        &Term::dup(
            4,
            "a",
            "b",
            Term::ctr("Pair", vec![Term::num(1), Term::lam("x", Term::var("x"))]),
            Term::ctr("Pair", vec![Term::var("a"), Term::var("b")]),
        ),
    )
    .unwrap();

    // dup-ctr, dup-lam, dup-par (same label)
    assert_eq!(rt.normal(ROOT).unwrap(), 3);
    let pair = symbols.id("Pair").unwrap();
    let (a, b) = pair_fields(&rt);
    for side in [a, b] {
        assert_eq!((side.tag(), side.fun(), side.arity()), (Tag::Ctr, pair, 2));
        assert_eq!(rt.heap().child(side, 0), Link::u32(1));
        let lam = rt.heap().child(side, 1);
        assert_eq!(lam.tag(), Tag::Lam);
        assert_eq!(rt.heap().child(lam, 1), Link::var(lam.loc(0)));
    }
    assert_ne!(a.loc(0), b.loc(0));
}

#[test]
fn duplicating_an_empty_constructor() {
    let symbols = symbols();
    let mut rt = Runtime::new();
    rt.boot(
        &symbols,
        &Term::dup(
            4,
            "a",
            "b",
            Term::ctr("Nil", vec![]),
            Term::ctr("Pair", vec![Term::var("a"), Term::var("b")]),
        ),
    )
    .unwrap();

    assert_eq!(rt.normal(ROOT).unwrap(), 1);
    let nil = Link::ctr(symbols.id("Nil").unwrap(), 0, 0);
    assert_eq!(pair_fields(&rt), (nil, nil));
    assert_eq!(rt.heap().free_groups(3), 1);
}

#[test]
fn duplicating_a_stuck_call() {
    // No rules: (F #1) is stuck, and copies keep the CAL tag.
    let symbols = symbols();
    let mut rt = Runtime::new();
    rt.boot(
        &symbols,
        &Term::dup(
            4,
            "a",
            "b",
            Term::cal("F", vec![Term::num(1)]),
            Term::ctr("Pair", vec![Term::var("a"), Term::var("b")]),
        ),
    )
    .unwrap();

    assert_eq!(rt.normal(ROOT).unwrap(), 1);
    let (a, b) = pair_fields(&rt);
    for side in [a, b] {
        assert_eq!(side.tag(), Tag::Cal);
        assert_eq!(rt.heap().child(side, 0), Link::u32(1));
    }
}

#[test]
fn stuck_application() {
    // λf (f #1)
    let mut rt = Runtime::new();
    let root = rt
        .boot(
            &symbols(),
            &Term::lam("f", Term::app(Term::var("f"), Term::num(1))),
        )
        .unwrap();
    assert_eq!(rt.normal(ROOT).unwrap(), 0);
    assert_eq!(rt.heap().deref(ROOT), root);
}

#[test]
fn calls_use_the_rulebook() {
    let symbols = symbols();
    let table = sum_rules(symbols.id("Sum").unwrap());
    let mut rt = Runtime::with_rules(Config::default(), &table);
    rt.boot(&symbols, &Term::cal("Sum", vec![Term::num(10)]))
        .unwrap();

    // Eleven calls and ten additions.
    assert_eq!(rt.normal(ROOT).unwrap(), 21);
    assert_eq!(rt.heap().deref(ROOT), Link::u32(55));
}

#[test]
fn shared_work_is_done_once() {
    init_tracing();
    let symbols = symbols();
    let table = sum_rules(symbols.id("Sum").unwrap());
    let sum = || Term::cal("Sum", vec![Term::num(10)]);

    // (+ Sum(10) Sum(10))
    let mut unshared = Runtime::with_rules(Config::default(), &table);
    unshared
        .boot(&symbols, &Term::op2(Op::Add, sum(), sum()))
        .unwrap();
    assert_eq!(unshared.normal(ROOT).unwrap(), 43);

    // !1<a b> = Sum(10); (+ a b)
    let mut shared = Runtime::with_rules(Config::default(), &table);
    shared
        .boot(
            &symbols,
            &Term::dup(
                1,
                "a",
                "b",
                sum(),
                Term::op2(Op::Add, Term::var("a"), Term::var("b")),
            ),
        )
        .unwrap();
    assert_eq!(shared.normal(ROOT).unwrap(), 22);
    assert_eq!(shared.heap().deref(ROOT), Link::u32(110));
}

#[test]
fn forcing_one_projection_serves_both() {
    // !1<a b> = Sum(10); (Pair a b)
    let symbols = symbols();
    let table = sum_rules(symbols.id("Sum").unwrap());
    let mut rt = Runtime::with_rules(Config::default(), &table);
    let root = rt
        .boot(
            &symbols,
            &Term::dup(
                1,
                "a",
                "b",
                Term::cal("Sum", vec![Term::num(10)]),
                Term::ctr("Pair", vec![Term::var("a"), Term::var("b")]),
            ),
        )
        .unwrap();

    assert_eq!(rt.reduce(root.loc(0)).unwrap(), Link::u32(55));
    assert_eq!(rt.interactions(), 21);
    // The other side was filled in without any further work.
    assert_eq!(rt.heap().child(root, 1), Link::u32(55));
    assert_eq!(rt.reduce(root.loc(1)).unwrap(), Link::u32(55));
    assert_eq!(rt.interactions(), 21);
}

#[test]
fn exhaustion_leaves_graph_intact() {
    // (&1<#1 #2> #3) needs five more slots to commute.
    let mut rt = Runtime::with_config(Config {
        capacity: 5,
        ..Default::default()
    });
    let root = rt
        .boot(
            &symbols(),
            &Term::app(Term::par(1, Term::num(1), Term::num(2)), Term::num(3)),
        )
        .unwrap();

    match rt.reduce(ROOT) {
        Err(Error::OutOfMemory { .. }) => (),
        v => panic!("unexpected reduce result: {:?}", v),
    }
    assert_eq!(rt.interactions(), 0);
    assert_eq!(rt.heap().deref(ROOT), root);
    assert_eq!(rt.heap().child(root, 1), Link::u32(3));
}

fn par_fields(rt: &Runtime<'_>, link: Link, label: u32) -> (Link, Link) {
    assert_eq!((link.tag(), link.label()), (Tag::Par, label), "got {}", link);
    (rt.heap().child(link, 0), rt.heap().child(link, 1))
}

#[test]
fn left_superposition_wins_in_operators() {
    // (- &1<#10 #20> &2<#1 #2>)
    let mut rt = Runtime::new();
    rt.boot(
        &symbols(),
        &Term::op2(
            Op::Sub,
            Term::par(1, Term::num(10), Term::num(20)),
            Term::par(2, Term::num(1), Term::num(2)),
        ),
    )
    .unwrap();
    rt.normal(ROOT).unwrap();

    let root = rt.heap().deref(ROOT);
    let (left, right) = par_fields(&rt, root, 1);
    assert_eq!(par_fields(&rt, left, 2), (Link::u32(9), Link::u32(8)));
    assert_eq!(par_fields(&rt, right, 2), (Link::u32(19), Link::u32(18)));
}

#[test]
fn commutation_forced_from_second_projection() {
    // !1<x y> = &2<#1 #2>; (Pair x y), forcing y first
    let mut rt = Runtime::new();
    let root = rt
        .boot(
            &symbols(),
            &Term::dup(
                1,
                "x",
                "y",
                Term::par(2, Term::num(1), Term::num(2)),
                Term::ctr("Pair", vec![Term::var("x"), Term::var("y")]),
            ),
        )
        .unwrap();

    let y = rt.reduce(root.loc(1)).unwrap();
    assert_eq!(y.tag(), Tag::Par);
    assert_eq!(rt.interactions(), 1);
    assert_eq!(rt.heap().child(root, 1), y);

    rt.normal(ROOT).unwrap();
    let (x, y) = pair_fields(&rt);
    assert_eq!(par_fields(&rt, x, 2), (Link::u32(1), Link::u32(2)));
    assert_eq!(par_fields(&rt, y, 2), (Link::u32(1), Link::u32(2)));
}

#[test]
fn constructor_copy_forced_from_second_projection() {
    // !4<a b> = (Pair #1 #2); (Pair a b), forcing b first
    let symbols = symbols();
    let mut rt = Runtime::new();
    let root = rt
        .boot(
            &symbols,
            &Term::dup(
                4,
                "a",
                "b",
                Term::ctr("Pair", vec![Term::num(1), Term::num(2)]),
                Term::ctr("Pair", vec![Term::var("a"), Term::var("b")]),
            ),
        )
        .unwrap();

    let b = rt.reduce(root.loc(1)).unwrap();
    assert_eq!(b.tag(), Tag::Ctr);
    assert_eq!(rt.heap().child(root, 1), b);

    assert_eq!(rt.normal(ROOT).unwrap(), 0);
    let pair = symbols.id("Pair").unwrap();
    let (a, b) = pair_fields(&rt);
    assert_ne!(a.loc(0), b.loc(0));
    for side in [a, b] {
        assert_eq!((side.tag(), side.fun()), (Tag::Ctr, pair));
        assert_eq!(rt.heap().child(side, 0), Link::u32(1));
        assert_eq!(rt.heap().child(side, 1), Link::u32(2));
    }
}
