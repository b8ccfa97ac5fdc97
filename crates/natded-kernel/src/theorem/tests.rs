use super::*;
use crate::expr::{Sort, VarRef};

fn b(i: u32) -> Expr {
    Expr::Var(VarRef::Bound(i))
}

fn app(f: &str, args: Vec<Expr>) -> Expr {
    Expr::Func(VarRef::free(f), args)
}

/// `P : Prop, Q : Prop, R : Term → Prop, f : Term → Term, c : Term`
fn base() -> Context {
    Context::empty()
        .extend_func("P", 0, Sort::Prop)
        .unwrap()
        .extend_func("Q", 0, Sort::Prop)
        .unwrap()
        .extend_func("R", 1, Sort::Prop)
        .unwrap()
        .extend_func("f", 1, Sort::Term)
        .unwrap()
        .extend_var("c")
        .unwrap()
}

fn atom(ctx: &Context, name: &str) -> Theorem {
    Theorem::func_mk(ctx, name, &[]).unwrap()
}

fn r_of(ctx: &Context, t: &Theorem) -> Theorem {
    Theorem::func_mk(ctx, "R", std::slice::from_ref(t)).unwrap()
}

fn var(ctx: &Context, x: &str) -> Theorem {
    Theorem::var_mk(ctx, x).unwrap()
}

/// `ctx, h : p` together with the proof of `p` by assumption.
fn assume(ctx: &Context, h: &str, p: &Theorem) -> (Context, Theorem) {
    let ctx = ctx.extend_hyp(h, p).unwrap();
    let thm = Theorem::assumption(&ctx, h).unwrap();
    (ctx, thm)
}

fn proves(t: &Theorem) -> &Expr {
    t.formula().expect("provable judgment")
}

#[test]
fn identity_by_assumption() {
    let ctx = base();
    let p = atom(&ctx, "P");
    let (inner, h) = assume(&ctx, "h", &p);
    let thm = Theorem::implies_intro(&h).unwrap();
    assert_eq!(thm.context(), &ctx);
    assert_eq!(
        thm.judgment(),
        &Judgment::Provable(Expr::implies(app("P", vec![]), app("P", vec![])))
    );
    assert_eq!(h.context(), &inner);
}

#[test]
fn assumption_rejects_declarations_and_unknown_names() {
    let ctx = base();
    assert!(matches!(
        Theorem::assumption(&ctx, "P"),
        Err(KernelError::ShapeMismatch { rule: "assumption", .. })
    ));
    assert!(matches!(
        Theorem::assumption(&ctx, "nope"),
        Err(KernelError::UnboundName { .. })
    ));
}

#[test]
fn weaken_extends_at_the_front_only() {
    let ctx = base();
    let top = Theorem::true_intro(&ctx);
    assert_eq!(top.weaken(&ctx).unwrap(), top);

    let wider = ctx.extend_var("x").unwrap();
    let weak = top.weaken(&wider).unwrap();
    assert_eq!(weak.context(), &wider);
    assert_eq!(weak.judgment(), top.judgment());

    assert!(matches!(
        weak.weaken(&ctx),
        Err(KernelError::ContextMismatch { rule: "weaken", .. })
    ));
}

#[test]
fn weakening_composes() {
    let (ctx, hp) = assume(&base(), "hp", &atom(&base(), "P"));
    let c2 = ctx.extend_var("x").unwrap();
    let c3 = c2.extend_var("y").unwrap();

    let stepwise = hp.weaken(&c2).unwrap().weaken(&c3).unwrap();
    let direct = hp.weaken(&c3).unwrap();
    assert_eq!(stepwise, direct);
    assert_eq!(stepwise.context(), &c3);
    assert_eq!(stepwise.judgment(), hp.judgment());

    // Extends ctx but not c2: reachable directly, not through c2.
    let other = ctx.extend_var("y").unwrap();
    assert!(hp.weaken(&other).is_ok());
    assert!(matches!(
        hp.weaken(&c2).unwrap().weaken(&other),
        Err(KernelError::ContextMismatch { rule: "weaken", .. })
    ));
}

#[test]
fn and_rules() {
    let ctx = base();
    let (ctx, hp) = assume(&ctx, "hp", &atom(&ctx, "P"));
    let (ctx, hq) = assume(&ctx, "hq", &atom(&ctx, "Q"));
    let hp = hp.weaken(&ctx).unwrap();
    let both = Theorem::and_intro(&hp, &hq).unwrap();
    assert_eq!(proves(&Theorem::and_left(&both).unwrap()), &app("P", vec![]));
    assert_eq!(proves(&Theorem::and_right(&both).unwrap()), &app("Q", vec![]));
}

#[test]
fn and_left_on_a_disjunction_is_a_shape_mismatch() {
    let ctx = base();
    let (ctx, hp) = assume(&ctx, "hp", &atom(&ctx, "P"));
    let or = Theorem::or_left(&hp, &atom(&ctx, "Q")).unwrap();
    assert_eq!(
        proves(&or),
        &Expr::or(app("P", vec![]), app("Q", vec![]))
    );
    assert!(matches!(
        Theorem::and_left(&or),
        Err(KernelError::ShapeMismatch { rule: "and_left", .. })
    ));
}

#[test]
fn combining_rules_require_identical_contexts() {
    let ctx = base();
    let top = Theorem::true_intro(&ctx);
    let other = ctx.extend_var("x").unwrap();
    let top2 = Theorem::true_intro(&other);
    assert!(matches!(
        Theorem::and_intro(&top, &top2),
        Err(KernelError::ContextMismatch { rule: "and_intro", .. })
    ));

    // Same entries in a different order.
    let swapped = Context::empty()
        .extend_func("Q", 0, Sort::Prop)
        .unwrap()
        .extend_func("P", 0, Sort::Prop)
        .unwrap();
    let straight = Context::empty()
        .extend_func("P", 0, Sort::Prop)
        .unwrap()
        .extend_func("Q", 0, Sort::Prop)
        .unwrap();
    assert!(matches!(
        Theorem::and_intro(&Theorem::true_intro(&straight), &Theorem::true_intro(&swapped)),
        Err(KernelError::ContextMismatch { .. })
    ));
}

#[test]
fn or_elim_by_cases() {
    // (P ∨ P) → P
    let ctx = base();
    let p = atom(&ctx, "P");
    let p_or_p = Theorem::or_mk(&p, &p).unwrap();
    let (ctx1, h) = assume(&ctx, "h", &p_or_p);
    let p1 = p.weaken(&ctx1).unwrap();
    let (_, hp) = assume(&ctx1, "hp", &p1);
    let case = Theorem::implies_intro(&hp).unwrap();
    let thm = Theorem::or_elim(&h, &case, &case).unwrap();
    assert_eq!(proves(&thm), &app("P", vec![]));

    let q = atom(&ctx1, "Q");
    let (_, hq) = assume(&ctx1, "hq", &q);
    let wrong = Theorem::implies_intro(&hq).unwrap();
    assert!(matches!(
        Theorem::or_elim(&h, &case, &wrong),
        Err(KernelError::FormulaMismatch { rule: "or_elim", .. })
    ));
}

#[test]
fn implies_elim_checks_the_antecedent() {
    let ctx = base();
    let p = atom(&ctx, "P");
    let q = atom(&ctx, "Q");
    let imp = Theorem::implies_mk(&p, &q).unwrap();
    let (ctx, h) = assume(&ctx, "h", &imp);
    let (ctx, hp) = assume(&ctx, "hp", &p.weaken(&ctx).unwrap());
    let h = h.weaken(&ctx).unwrap();
    assert_eq!(
        proves(&Theorem::implies_elim(&h, &hp).unwrap()),
        &app("Q", vec![])
    );
    let top = Theorem::true_intro(&ctx);
    assert!(matches!(
        Theorem::implies_elim(&h, &top),
        Err(KernelError::FormulaMismatch { .. })
    ));
}

#[test]
fn implies_intro_needs_a_hypothesis_in_front() {
    let ctx = base();
    let top = Theorem::true_intro(&ctx);
    assert!(matches!(
        Theorem::implies_intro(&top),
        Err(KernelError::ShapeMismatch { rule: "implies_intro", .. })
    ));
    assert!(matches!(
        Theorem::implies_intro(&Theorem::true_intro(&Context::empty())),
        Err(KernelError::ShapeMismatch { .. })
    ));
}

#[test]
fn negation_and_classical_rules() {
    let ctx = base();
    let p = atom(&ctx, "P");
    let not_p = Theorem::not_mk(&p).unwrap();

    // P, ¬P ⊢ ⊥, then anything.
    let (ctx1, hp) = assume(&ctx, "hp", &p);
    let (ctx2, hn) = assume(&ctx1, "hn", &not_p.weaken(&ctx1).unwrap());
    let hp = hp.weaken(&ctx2).unwrap();
    let bottom = Theorem::not_elim(&hn, &hp).unwrap();
    assert_eq!(proves(&bottom), &Expr::Bottom);
    let q = atom(&ctx2, "Q");
    assert_eq!(
        proves(&Theorem::false_elim(&bottom, &q).unwrap()),
        &app("Q", vec![])
    );

    // ¬¬P → P via raa
    let (ctx3, hnn) = assume(&ctx, "hnn", &Theorem::not_mk(&not_p).unwrap());
    let (_, hn) = assume(&ctx3, "hn", &not_p.weaken(&ctx3).unwrap());
    let hnn = hnn.weaken(hn.context()).unwrap();
    let absurd = Theorem::not_elim(&hnn, &hn).unwrap();
    let p_back = Theorem::raa(&Theorem::implies_intro(&absurd).unwrap()).unwrap();
    assert_eq!(p_back.context(), &ctx3);
    assert_eq!(proves(&p_back), &app("P", vec![]));

    // Discharging ¬P from P, ¬P ⊢ ⊥ gives ¬¬P.
    let refute = Theorem::implies_intro(&bottom).unwrap();
    assert_eq!(refute.context(), &ctx1);
    assert_eq!(
        proves(&Theorem::not_intro(&refute).unwrap()),
        &Expr::not(Expr::not(app("P", vec![])))
    );
    assert!(matches!(
        Theorem::not_intro(&Theorem::implies_intro(&hn).unwrap()),
        Err(KernelError::FormulaMismatch { rule: "not_intro", .. })
    ));
}

#[test]
fn iff_rules() {
    let ctx = base();
    let p = atom(&ctx, "P");
    let (_, hp) = assume(&ctx, "hp", &p);
    let p_to_p = Theorem::implies_intro(&hp).unwrap();
    assert_eq!(p_to_p.context(), &ctx);
    let iff = Theorem::iff_intro(&p_to_p, &p_to_p).unwrap();
    let pp = Expr::implies(app("P", vec![]), app("P", vec![]));
    assert_eq!(proves(&Theorem::iff_left(&iff).unwrap()), &pp);
    assert_eq!(proves(&Theorem::iff_right(&iff).unwrap()), &pp);
}

#[test]
fn equality_substitutes_under_a_motive() {
    // a = b, R(a) ⊢ R(b)
    let ctx = base().extend_var("a").unwrap().extend_var("b").unwrap();
    let eq = Theorem::eq_mk(&var(&ctx, "a"), &var(&ctx, "b")).unwrap();
    let (ctx, heq) = assume(&ctx, "heq", &eq);
    let ra = r_of(&ctx, &var(&ctx, "a"));
    let (ctx, hra) = assume(&ctx, "hra", &ra);
    let heq = heq.weaken(&ctx).unwrap();

    let inner = ctx.extend_var("z").unwrap();
    let motive = Theorem::lam_mk(&r_of(&inner, &var(&inner, "z"))).unwrap();
    assert_eq!(motive.context(), &ctx);

    let rb = Theorem::eq_elim(&motive, &heq, &hra).unwrap();
    assert_eq!(proves(&rb), &app("R", vec![Expr::free_var("b")]));

    // The motive must produce the premise.
    let top = Theorem::true_intro(&ctx);
    assert!(matches!(
        Theorem::eq_elim(&motive, &heq, &top),
        Err(KernelError::FormulaMismatch { rule: "eq_elim", .. })
    ));

    let refl = Theorem::eq_intro(&var(&ctx, "a")).unwrap();
    assert_eq!(
        proves(&refl),
        &Expr::equals(Expr::free_var("a"), Expr::free_var("a"))
    );
}

#[test]
fn forall_intro_then_elim() {
    let ctx = base();
    let inner = ctx.extend_var("x").unwrap();
    let fx = Theorem::func_mk(&inner, "f", &[var(&inner, "x")]).unwrap();
    let refl = Theorem::eq_intro(&fx).unwrap();
    let all = Theorem::forall_intro(&refl).unwrap();
    assert_eq!(all.context(), &ctx);
    let fb0 = app("f", vec![b(0)]);
    assert_eq!(proves(&all), &Expr::forall("x", Expr::equals(fb0.clone(), fb0)));

    let inst = Theorem::forall_elim(&all, &var(&ctx, "c")).unwrap();
    let fc = app("f", vec![Expr::free_var("c")]);
    assert_eq!(proves(&inst), &Expr::equals(fc.clone(), fc));

    // Generalizing needs a term variable in front.
    assert!(matches!(
        Theorem::forall_intro(&Theorem::true_intro(&ctx.extend_func("S", 0, Sort::Prop).unwrap())),
        Err(KernelError::ShapeMismatch { rule: "forall_intro", .. })
    ));
}

#[test]
fn exists_intro_and_elim() {
    let ctx = base();
    let rc = r_of(&ctx, &var(&ctx, "c"));
    let (ctx1, hrc) = assume(&ctx, "hrc", &rc);

    let z = ctx1.extend_var("z").unwrap();
    let motive = Theorem::lam_mk(&r_of(&z, &var(&z, "z"))).unwrap();
    let ex = Theorem::exists_intro(&motive, &var(&ctx1, "c"), &hrc).unwrap();
    assert_eq!(proves(&ex), &Expr::exists("z", app("R", vec![b(0)])));

    // ∃x R(x), ∀y (R(y) → ⊤) ⊢ ⊤
    let y = ctx1.extend_var("y").unwrap();
    let ry = r_of(&y, &var(&y, "y"));
    let (y_h, _) = assume(&y, "hy", &ry);
    let step = Theorem::implies_intro(&Theorem::true_intro(&y_h)).unwrap();
    let all = Theorem::forall_intro(&step).unwrap();
    let thm = Theorem::exists_elim(&ex, &all).unwrap();
    assert_eq!(proves(&thm), &Expr::Top);

    // The conclusion may not depend on the witness.
    let ry_thm = Theorem::assumption(&y_h, "hy").unwrap();
    let leak = Theorem::forall_intro(&Theorem::implies_intro(&ry_thm).unwrap()).unwrap();
    assert!(matches!(
        Theorem::exists_elim(&ex, &leak),
        Err(KernelError::ShapeMismatch { rule: "exists_elim", .. })
    ));
}

#[test]
fn unique_rules() {
    // One element c with c = c is unique up to the hypothesis.
    let ctx = base();
    let x = ctx.extend_var("x").unwrap();
    let motive_body = Theorem::eq_mk(&var(&x, "x"), &var(&x, "c")).unwrap();
    let motive = Theorem::lam_mk(&motive_body).unwrap();
    let refl = Theorem::eq_intro(&var(&ctx, "c")).unwrap();
    let ex = Theorem::exists_intro(&motive, &var(&ctx, "c"), &refl).unwrap();

    // ∀y ∀z, (y = c ∧ z = c) → y = z
    let yz = ctx.extend_var("y").unwrap().extend_var("z").unwrap();
    let yc = Theorem::eq_mk(&var(&yz, "y"), &var(&yz, "c")).unwrap();
    let zc = Theorem::eq_mk(&var(&yz, "z"), &var(&yz, "c")).unwrap();
    let both = Theorem::and_mk(&yc, &zc).unwrap();
    let (h_ctx, h) = assume(&yz, "h", &both);
    let (yc_p, zc_p) = (Theorem::and_left(&h).unwrap(), Theorem::and_right(&h).unwrap());

    // y = z from y = c and z = c: rewrite c to z in y = c with motive λw, y = w
    let w = h_ctx.extend_var("w").unwrap();
    let motive_yw = Theorem::lam_mk(&Theorem::eq_mk(&var(&w, "y"), &var(&w, "w")).unwrap()).unwrap();
    let refl_z = Theorem::eq_intro(&var(&h_ctx, "z")).unwrap();
    let motive_wz = Theorem::lam_mk(&Theorem::eq_mk(&var(&w, "w"), &var(&w, "z")).unwrap()).unwrap();
    let c_eq_z = Theorem::eq_elim(&motive_wz, &zc_p, &refl_z).unwrap();
    let y_eq_z = Theorem::eq_elim(&motive_yw, &c_eq_z, &yc_p).unwrap();
    assert_eq!(
        proves(&y_eq_z),
        &Expr::equals(Expr::free_var("y"), Expr::free_var("z"))
    );

    let uniq = Theorem::forall_intro(
        &Theorem::forall_intro(&Theorem::implies_intro(&y_eq_z).unwrap()).unwrap(),
    )
    .unwrap();
    let unique = Theorem::unique_intro(&ex, &uniq).unwrap();
    let body = Expr::equals(b(0), Expr::free_var("c"));
    assert_eq!(proves(&unique), &Expr::Unique(Name::from("x"), Arc::new(body)));
    assert_eq!(proves(&Theorem::unique_left(&unique).unwrap()), proves(&ex));
    assert_eq!(proves(&Theorem::unique_right(&unique).unwrap()), proves(&uniq));

    assert!(matches!(
        Theorem::unique_intro(&ex, &refl),
        Err(KernelError::FormulaMismatch { rule: "unique_intro", .. })
    ));
}

#[test]
fn predicate_binder_instantiates_by_beta_reduction() {
    // ⊢ ∀S/1, S(c) → S(c), instantiated with λx, R(f(x))
    let ctx = base();
    let s = ctx.extend_func("S", 1, Sort::Prop).unwrap();
    let sc = Theorem::func_mk(&s, "S", &[var(&s, "c")]).unwrap();
    let (_, h) = assume(&s, "h", &sc);
    let body = Theorem::implies_intro(&h).unwrap();
    let all = Theorem::forall_pred_intro(&body).unwrap();
    assert_eq!(all.context(), &ctx);
    let sc_bound = Expr::Func(VarRef::Bound(0), vec![Expr::free_var("c")]);
    assert_eq!(
        proves(&all),
        &Expr::ForallFunc(
            Name::from("S"),
            1,
            Sort::Prop,
            Arc::new(Expr::implies(sc_bound.clone(), sc_bound))
        )
    );

    let x = ctx.extend_var("x").unwrap();
    let fx = Theorem::func_mk(&x, "f", &[var(&x, "x")]).unwrap();
    let lam = Theorem::lam_mk(&r_of(&x, &fx)).unwrap();
    let inst = Theorem::forall_pred_elim(&all, &lam).unwrap();
    let rfc = app("R", vec![app("f", vec![Expr::free_var("c")])]);
    assert_eq!(proves(&inst), &Expr::implies(rfc.clone(), rfc));

    // The function rule does not accept a predicate binder.
    assert!(matches!(
        Theorem::forall_func_elim(&all, &lam),
        Err(KernelError::ShapeMismatch { rule: "forall_func_elim", .. })
    ));
    // Arity must match.
    let xy = x.extend_var("y").unwrap();
    let eq = Theorem::eq_mk(&var(&xy, "x"), &var(&xy, "y")).unwrap();
    let two = Theorem::lam_mk(&Theorem::lam_mk(&eq).unwrap()).unwrap();
    assert!(matches!(
        Theorem::forall_pred_elim(&all, &two),
        Err(KernelError::ArityMismatch { .. })
    ));
}

#[test]
fn function_binder_requires_term_sort_with_arguments() {
    let ctx = base();
    let g = ctx.extend_func("g", 1, Sort::Term).unwrap();
    let gc = Theorem::func_mk(&g, "g", &[var(&g, "c")]).unwrap();
    let refl = Theorem::eq_intro(&gc).unwrap();
    let all = Theorem::forall_func_intro(&refl).unwrap();
    assert_eq!(all.context(), &ctx);

    let x = ctx.extend_var("x").unwrap();
    let id = Theorem::lam_mk(&var(&x, "x")).unwrap();
    let inst = Theorem::forall_func_elim(&all, &id).unwrap();
    assert_eq!(
        proves(&inst),
        &Expr::equals(Expr::free_var("c"), Expr::free_var("c"))
    );

    let k = ctx.extend_var("k").unwrap();
    assert!(matches!(
        Theorem::forall_func_intro(&Theorem::true_intro(&k)),
        Err(KernelError::ShapeMismatch { .. })
    ));
    let p = ctx.extend_func("T", 1, Sort::Prop).unwrap();
    assert!(matches!(
        Theorem::forall_func_intro(&Theorem::true_intro(&p)),
        Err(KernelError::ShapeMismatch { .. })
    ));
}

#[test]
fn formation_checks_arity_and_kinds() {
    let ctx = base();
    assert!(matches!(
        Theorem::func_mk(&ctx, "R", &[]),
        Err(KernelError::ArityMismatch { found: 0, .. })
    ));
    assert!(matches!(
        Theorem::func_mk(&ctx, "c", &[]),
        Err(KernelError::ShapeMismatch { rule: "func_mk", .. })
    ));
    assert!(matches!(
        Theorem::var_mk(&ctx, "f"),
        Err(KernelError::ShapeMismatch { rule: "var_mk", .. })
    ));
    assert!(matches!(
        Theorem::var_mk(&ctx, "nope"),
        Err(KernelError::UnboundName { .. })
    ));
    // A formula is not a term argument.
    assert!(matches!(
        Theorem::func_mk(&ctx, "R", &[atom(&ctx, "P")]),
        Err(KernelError::ShapeMismatch { .. })
    ));
}

#[test]
fn lam_mk_raises_arity_and_binders_pop_the_front() {
    let ctx = base();
    let xy = ctx.extend_var("x").unwrap().extend_var("y").unwrap();
    let eq = Theorem::eq_mk(&var(&xy, "x"), &var(&xy, "y")).unwrap();
    let lam2 = Theorem::lam_mk(&Theorem::lam_mk(&eq).unwrap()).unwrap();
    assert_eq!(lam2.context(), &ctx);
    assert_eq!(
        lam2.judgment(),
        &Judgment::HasType(
            Expr::lam("x", Expr::lam("y", Expr::equals(b(1), b(0)))),
            Type::function(2, Sort::Prop)
        )
    );

    let all = Theorem::forall_mk(&eq).unwrap();
    let ex = Theorem::exists_mk(&all).unwrap();
    assert_eq!(
        ex.judgment(),
        &Judgment::HasType(
            Expr::exists("x", Expr::forall("y", Expr::equals(b(1), b(0)))),
            Type::FORMULA
        )
    );
}

#[test]
fn schema_formation() {
    let ctx = base()
        .extend_schema("Sch", 1, Sort::Prop, 0, Sort::Prop)
        .unwrap();
    let x = ctx.extend_var("x").unwrap();
    let arg = Theorem::lam_mk(&r_of(&x, &var(&x, "x"))).unwrap();
    let applied = Theorem::schema_mk(&ctx, "Sch", &arg).unwrap();
    assert_eq!(
        applied.judgment(),
        &Judgment::HasType(
            Expr::Schema(
                VarRef::free("Sch"),
                Arc::new(Expr::lam("x", app("R", vec![b(0)])))
            ),
            Type::FORMULA
        )
    );
    assert!(matches!(
        Theorem::schema_mk(&ctx, "Sch", &atom(&ctx, "P")),
        Err(KernelError::ShapeMismatch { rule: "schema_mk", .. })
    ));
}

#[test]
fn theorems_serialize_but_keep_their_shape() {
    let ctx = base();
    let thm = Theorem::true_intro(&ctx);
    let json = serde_json::to_value(&thm).unwrap();
    assert_eq!(json["judgment"], serde_json::json!({ "provable": "top" }));
    assert_eq!(json["context"].as_array().map(Vec::len), Some(5));
}
