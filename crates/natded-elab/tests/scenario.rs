//! End to end: from three hypotheses about `L` and `B`, conclude that
//! nothing is `L`-related to `Q`.
//!
//! - H1: ∀x ∀y, L(x, y) → ∀z, z ≠ y → ¬L(x, z)
//! - H2: ∀x ∀y ∀z, B(x, y, z) → (L(x, z) → L(x, y))
//! - H3: ∃x, x ≠ Q ∧ ∀y, B(y, x, Q)
//!
//! Goal: ¬∃x, L(x, Q).

use natded_elab::{Decl, Elaborator, Proof, Syntax, builder, check_script};
use natded_kernel::{Context, Expr, Judgment, Sort, VarRef};

fn v(name: &str) -> Syntax {
    Syntax::var(name)
}

fn l(x: Syntax, y: Syntax) -> Syntax {
    Syntax::app("L", vec![x, y])
}

fn b(x: Syntax, y: Syntax, z: Syntax) -> Syntax {
    Syntax::app("B", vec![x, y, z])
}

fn hypotheses() -> Context {
    let h1 = Syntax::forall(
        "x",
        Syntax::forall(
            "y",
            Syntax::implies(
                l(v("x"), v("y")),
                Syntax::forall(
                    "z",
                    Syntax::implies(Syntax::neq(v("z"), v("y")), Syntax::not(l(v("x"), v("z")))),
                ),
            ),
        ),
    );
    let h2 = Syntax::forall(
        "x",
        Syntax::forall(
            "y",
            Syntax::forall(
                "z",
                Syntax::implies(
                    b(v("x"), v("y"), v("z")),
                    Syntax::implies(l(v("x"), v("z")), l(v("x"), v("y"))),
                ),
            ),
        ),
    );
    let h3 = Syntax::exists(
        "x",
        Syntax::and(
            Syntax::neq(v("x"), v("Q")),
            Syntax::forall("y", b(v("y"), v("x"), v("Q"))),
        ),
    );

    let mut ctx = Context::empty()
        .extend_func("L", 2, Sort::Prop)
        .unwrap()
        .extend_func("B", 3, Sort::Prop)
        .unwrap()
        .extend_var("Q")
        .unwrap();
    for (name, formula) in [("H1", h1), ("H2", h2), ("H3", h3)] {
        let p = builder::build_formula(&ctx, &formula).unwrap();
        ctx = ctx.extend_hyp(name, &p).unwrap();
    }
    ctx
}

fn script() -> Decl {
    let by = Proof::by;

    // L(a, c)
    let lac = Proof::implies_elim(
        Proof::implies_elim(
            Proof::forall_elims(by("H2"), [v("a"), v("c"), v("Q")]),
            Proof::forall_elim(Proof::and_right(by("hc")), v("a")),
        ),
        by("ha"),
    );
    // ⊥ from H1 at (a, Q), instantiated at c, against L(a, c)
    let bot = Proof::not_elim(
        Proof::implies_elim(
            Proof::forall_elim(
                Proof::implies_elim(Proof::forall_elims(by("H1"), [v("a"), v("Q")]), by("ha")),
                v("c"),
            ),
            Proof::and_left(by("hc")),
        ),
        by("lac"),
    );

    let inner = Decl::any(
        "a",
        Decl::assume(
            "ha",
            l(v("a"), v("Q")),
            Decl::block(vec![
                Decl::assertion("lac", Some(l(v("a"), v("c"))), lac),
                Decl::assertion("bot", Some(Syntax::False), bot),
            ]),
        ),
    );
    let witness_scope = Decl::any(
        "c",
        Decl::assume(
            "hc",
            Syntax::and(
                Syntax::neq(v("c"), v("Q")),
                Syntax::forall("y", b(v("y"), v("c"), v("Q"))),
            ),
            Decl::block(vec![
                inner,
                Decl::assertion(
                    "bot2",
                    Some(Syntax::False),
                    Proof::exists_elim(by("h"), by("bot")),
                ),
            ]),
        ),
    );

    Decl::block(vec![
        Decl::assume(
            "h",
            Syntax::exists("x", l(v("x"), v("Q"))),
            Decl::block(vec![
                witness_scope,
                Decl::assertion(
                    "bot3",
                    Some(Syntax::False),
                    Proof::exists_elim(by("H3"), by("bot2")),
                ),
            ]),
        ),
        Decl::assertion(
            "goal",
            Some(Syntax::not(Syntax::exists("x", l(v("x"), v("Q"))))),
            Proof::not_intro(by("bot3")),
        ),
    ])
}

#[test]
fn concludes_nothing_is_related_to_q() {
    let ctx = hypotheses();
    let (thm, pool) = check_script(&ctx, &script()).unwrap();

    assert_eq!(thm.context(), &ctx);
    let l_x_q = Expr::Func(
        VarRef::free("L"),
        vec![Expr::Var(VarRef::Bound(0)), Expr::free_var("Q")],
    );
    assert_eq!(
        thm.judgment(),
        &Judgment::Provable(Expr::not(Expr::exists("x", l_x_q)))
    );
    insta::assert_snapshot!(thm.judgment().to_string(), @"⊢ ¬(∃x, L(x, Q))");

    // Every intermediate result was discharged down to the root.
    assert_eq!(pool.depth(), 1);
    let names: Vec<&str> = pool.innermost().keys().map(String::as_str).collect();
    assert_eq!(names, ["bot", "bot2", "bot3", "goal", "lac"]);
    for thm in pool.innermost().values() {
        assert_eq!(thm.context(), &ctx);
    }
}

#[test]
fn discharged_lemmas_carry_their_scopes() {
    let ctx = hypotheses();
    let (_, pool) = check_script(&ctx, &script()).unwrap();
    let lac = pool.lookup("lac").unwrap();
    insta::assert_snapshot!(
        lac.judgment().to_string(),
        @"⊢ ((∃x, L(x, Q)) → (∀c, ((¬(c = Q) ∧ (∀y, B(y, c, Q))) → (∀a, (L(a, Q) → L(a, c))))))"
    );
}

#[test]
fn a_wrong_witness_is_rejected_and_the_elaborator_recovers() {
    let ctx = hypotheses();
    // H3 cannot discharge an existential whose body differs from it.
    let bad = Decl::assume(
        "h",
        Syntax::exists("x", l(v("x"), v("Q"))),
        Decl::assertion("bad", None, Proof::exists_elim(Proof::by("H3"), Proof::by("H1"))),
    );
    let mut elab = Elaborator::default();
    let err = elab.check_decl(&ctx, &bad).unwrap_err();
    assert!(err.to_string().starts_with("assume `h` / assertion `bad`: exists_elim"));
    assert_eq!(elab.pool().depth(), 1);

    // Assertions checked before the failure are not kept either.
    let partial = Decl::block(vec![
        Decl::assertion("ok", Some(Syntax::True), Proof::TrueIntro),
        Decl::assertion("lost", None, Proof::by("nope")),
    ]);
    assert!(elab.check_decl(&ctx, &partial).is_err());
    assert_eq!(elab.pool().depth(), 1);
    assert!(elab.pool().innermost().is_empty());
    assert!(elab.pool().lookup("ok").is_none());

    let thm = elab.check_decl(&ctx, &script()).unwrap();
    assert_eq!(thm.context(), &ctx);
    let names: Vec<&str> = elab.pool().innermost().keys().map(String::as_str).collect();
    assert_eq!(names, ["bot", "bot2", "bot3", "goal", "lac"]);
}
