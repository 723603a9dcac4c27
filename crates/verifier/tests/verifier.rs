use sil_ir::{
    builder::test_util::TestModuleBuilder,
    inst::{
        AllocRef, AllocVar, ArchetypeMethod, ArchetypeToSuper, AssociatedMetatype, CondBranch,
        ConstantRef, CopyAddr, DeallocRef, DeallocVar, DeinitExistential, DestroyAddr, Downcast,
        ElementAddr, Extract, IndexAddr, InitExistential, IntegerValue, Load, Metatype,
        ProjectExistential, ProtocolMethod, RefElementAddr, Return, Specialize, Store,
        SuperToArchetype, Tuple, ZeroAddr, ZeroValue,
    },
    BlockId, FunctionBuilder, Module, ModuleBuilder, ModuleCtx, Signature, SilType, Type, ValueId,
};
use sil_verifier::{
    build_and_verify, verify_function, verify_module, DiagnosticCode, Location,
    ModuleBuilderVerifyExt, VerificationLevel, VerificationReport, VerifierConfig, ViolationKind,
};
use smallvec::smallvec;

fn full() -> VerifierConfig {
    VerifierConfig::for_level(VerificationLevel::Full)
}

fn messages(report: &VerificationReport) -> Vec<&str> {
    report
        .iter()
        .map(|diagnostic| diagnostic.message.as_str())
        .collect()
}

fn codes(report: &VerificationReport) -> Vec<DiagnosticCode> {
    report.iter().map(|diagnostic| diagnostic.code).collect()
}

/// Types shared by the per-instruction tests.
struct Types {
    unit: Type,
    class: Type,
    proto: Type,
    arch: Type,
    bounded_arch: Type,
    arch_meta: Type,
    int_meta: Type,
    pair: Type,
    int_to_int: Type,
    poly: Type,
    arch_method: Type,
    arch_meta_method: Type,
    int_meta_method: Type,
    proto_method: Type,
}

/// Builds `main : () -> ()` whose entry block holds the instructions added
/// by `body` followed by `return ()`, and verifies it with `cfg`.
fn check_body_with(
    cfg: &VerifierConfig,
    body: impl FnOnce(&mut FunctionBuilder<'_>, &Types),
) -> VerificationReport {
    let mut mb = TestModuleBuilder::new();
    let m = mb.module_builder();
    let unit = m.unit_type();
    let class = m.declare_class_type("Node");
    let arch = m.declare_archetype("T", None);
    let int_meta = m.metatype(Type::I64);
    let arch_meta = m.metatype(arch);
    let int_to_int = m.declare_func_type(Type::I64, Type::I64);
    let tys = Types {
        unit,
        class,
        proto: m.declare_protocol_type("Drawable"),
        arch,
        bounded_arch: m.declare_archetype("U", Some(class)),
        arch_meta,
        int_meta,
        pair: m.declare_tuple_type(&[Type::I64, Type::I1]),
        int_to_int,
        poly: m.declare_poly_func_type(&[arch], arch, arch),
        arch_method: m.declare_func_type(arch, int_to_int),
        arch_meta_method: m.declare_func_type(arch_meta, int_to_int),
        int_meta_method: m.declare_func_type(int_meta, int_to_int),
        proto_method: m.declare_func_type(Type::RawPointer, int_to_int),
    };
    let main_ty = m.declare_func_type(unit, unit);

    let mut builder = mb.func_builder("main", main_ty);
    let entry = builder.append_block();
    builder.switch_to_block(entry);
    body(&mut builder, &tys);
    let unit_value = builder.insert_inst(Tuple::new(smallvec![]), SilType::object(tys.unit));
    builder.ret(Some(unit_value));

    let module = mb.build();
    verify_module(&module, cfg)
}

fn check_body(body: impl FnOnce(&mut FunctionBuilder<'_>, &Types)) -> VerificationReport {
    check_body_with(&full(), body)
}

type Body = Box<dyn FnOnce(&mut FunctionBuilder<'_>, &Types)>;

fn case(
    name: &'static str,
    body: impl FnOnce(&mut FunctionBuilder<'_>, &Types) + 'static,
    expected: &[&'static str],
) -> (&'static str, Body, Vec<&'static str>) {
    (name, Box::new(body), expected.to_vec())
}

fn run_cases(cases: Vec<(&'static str, Body, Vec<&'static str>)>) {
    for (name, body, expected) in cases {
        let report = check_body(body);
        assert_eq!(messages(&report), expected, "{name}: {report}");
    }
}

fn slot(builder: &mut FunctionBuilder<'_>, ty: Type) -> ValueId {
    builder.insert_inst(AllocVar::new(), SilType::address(ty))
}

fn int(builder: &mut FunctionBuilder<'_>) -> ValueId {
    builder.integer_literal(7, Type::I64)
}

fn object(builder: &mut FunctionBuilder<'_>, ty: Type) -> ValueId {
    builder.insert_inst(ZeroValue::new(), SilType::object(ty))
}

/// `main : (Builtin.Int64) -> Builtin.Int64` storing its argument, loading it
/// back and passing it to `add` before returning from a second block.
fn well_formed_module() -> Module {
    let mut mb = TestModuleBuilder::new();
    let input = mb
        .module_builder()
        .declare_tuple_type(&[Type::I64, Type::I64]);
    let add_ty = mb.module_builder().declare_func_type(input, Type::I64);
    let main_ty = mb.module_builder().declare_func_type(Type::I64, Type::I64);

    let mut builder = mb.func_builder("main", main_ty);
    let entry = builder.append_block();
    let arg = builder.append_block_param(entry, SilType::object(Type::I64));
    let exit = builder.append_block();
    let out = builder.append_block_param(exit, SilType::object(Type::I64));

    builder.switch_to_block(entry);
    let var = slot(&mut builder, Type::I64);
    builder.store(arg, var);
    let loaded = builder.load(var);
    let callee = builder.insert_inst(
        ConstantRef::new("add".to_string()),
        SilType::object(add_ty),
    );
    let one = builder.integer_literal(1, Type::I64);
    let sum = builder.apply(callee, &[loaded, one], SilType::object(Type::I64));
    builder.insert_inst_no_result(DeallocVar::new(var));
    builder.br(exit, &[sum]);

    builder.switch_to_block(exit);
    builder.ret(Some(out));

    mb.build()
}

#[test]
fn well_formed_function_is_ok() {
    let module = well_formed_module();
    for level in [
        VerificationLevel::Fast,
        VerificationLevel::Standard,
        VerificationLevel::Full,
    ] {
        let report = verify_module(&module, &VerifierConfig::for_level(level));
        assert!(report.is_ok(), "{level}: {report}");
    }
}

#[test]
fn verification_is_idempotent() {
    let module = well_formed_module();
    let cfg = full();
    let first = verify_module(&module, &cfg);
    let second = verify_module(&module, &cfg);
    assert!(first.is_empty());
    assert_eq!(first, second);

    let mut mb = TestModuleBuilder::new();
    let unit = mb.ctx().unit_type();
    let ty = mb.module_builder().declare_func_type(unit, unit);
    let mut builder = mb.func_builder("broken", ty);
    let entry = builder.append_block();
    builder.switch_to_block(entry);
    let value = builder.integer_literal(1, Type::I64);
    builder.retain(value);
    let module = mb.build();

    let first = verify_module(&module, &cfg);
    let second = verify_module(&module, &cfg);
    assert!(first.has_errors());
    assert_eq!(first, second);
}

#[test]
fn block_without_terminator() {
    let mut mb = TestModuleBuilder::new();
    let unit = mb.ctx().unit_type();
    let ty = mb.module_builder().declare_func_type(unit, unit);
    let mut builder = mb.func_builder("open", ty);
    let entry = builder.append_block();
    builder.switch_to_block(entry);
    slot(&mut builder, Type::I64);
    let func_ref = mb.func_ref().unwrap();
    let module = mb.build();

    let report = verify_module(&module, &full());
    assert_eq!(report.len(), 1, "{report}");
    let diag = &report.diagnostics[0];
    assert_eq!(diag.code, DiagnosticCode::MissingTerminator);
    assert_eq!(diag.kind(), ViolationKind::Structural);
    assert_eq!(diag.message, "block must end in terminator");
    assert_eq!(
        diag.primary,
        Location::Block {
            func: func_ref,
            block: entry,
        }
    );
}

#[test]
fn empty_block_and_missing_entry() {
    let mut mb = TestModuleBuilder::new();
    let unit = mb.ctx().unit_type();
    let ty = mb.module_builder().declare_func_type(unit, unit);

    let mut builder = mb.func_builder("hollow", ty);
    let entry = builder.append_block();
    let empty = builder.append_block();
    builder.switch_to_block(entry);
    builder.br(empty, &[]);
    let hollow = mb.func_ref().unwrap();

    mb.func_builder("declared", ty);
    let declared = mb.func_ref().unwrap();
    let module = mb.build();

    let cfg = full();
    let report = verify_function(&module.ctx, hollow, &module.funcs[hollow], &cfg);
    assert_eq!(codes(&report), vec![DiagnosticCode::EmptyBlock]);
    assert_eq!(messages(&report), vec!["block must not be empty"]);

    let report = verify_function(&module.ctx, declared, &module.funcs[declared], &cfg);
    assert_eq!(codes(&report), vec![DiagnosticCode::MissingEntryBlock]);
    assert_eq!(report.diagnostics[0].primary, Location::Function(declared));
}

#[test]
fn terminator_placement() {
    let mut mb = TestModuleBuilder::new();
    let unit = mb.ctx().unit_type();
    let ty = mb.module_builder().declare_func_type(unit, unit);
    let mut builder = mb.func_builder("early", ty);
    let entry = builder.append_block();
    let next = builder.append_block();
    builder.switch_to_block(entry);
    let value = builder.integer_literal(1, Type::I64);
    let ret = builder.ret(Some(value));
    let trailing = builder.insert_inst(AllocVar::new(), SilType::address(Type::I64));
    let trailing = builder.func.dfg.value_inst(trailing).unwrap();

    builder.switch_to_block(next);
    let br = builder.br(next, &[]);
    builder.ret(Some(value));
    let func_ref = mb.func_ref().unwrap();
    let module = mb.build();

    let report = verify_module(&module, &VerifierConfig::for_level(VerificationLevel::Fast));
    assert_eq!(
        codes(&report),
        vec![
            DiagnosticCode::TerminatorNotLast,
            DiagnosticCode::NonTerminatorAtEnd,
            DiagnosticCode::TerminatorNotLast,
        ]
    );
    let insts: Vec<_> = report
        .iter()
        .map(|diagnostic| match diagnostic.primary {
            Location::Inst { func, inst, .. } => {
                assert_eq!(func, func_ref);
                inst
            }
            ref other => panic!("unexpected location {other}"),
        })
        .collect();
    assert_eq!(insts, vec![ret, trailing, br]);
}

#[test]
fn load_from_non_address_keeps_checking() {
    let report = check_body(|b, _| {
        let value = int(b);
        b.load(value);
        b.retain(value);
    });

    assert_eq!(
        messages(&report),
        vec![
            "load operand must be an address",
            "retain operand must have reference semantics",
        ]
    );
    assert!(report
        .iter()
        .all(|diagnostic| diagnostic.kind() == ViolationKind::TypeMismatch));
}

#[test]
fn apply_arity_mismatch_skips_argument_types() {
    let mut mb = TestModuleBuilder::new();
    let input = mb
        .module_builder()
        .declare_tuple_type(&[Type::I64, Type::I64, Type::I64]);
    let callee_ty = mb.module_builder().declare_func_type(input, Type::I64);
    let unit = mb.ctx().unit_type();
    let main_ty = mb.module_builder().declare_func_type(unit, Type::I64);

    let mut builder = mb.func_builder("main", main_ty);
    let entry = builder.append_block();
    builder.switch_to_block(entry);
    let callee = builder.insert_inst(
        ConstantRef::new("sum3".to_string()),
        SilType::object(callee_ty),
    );
    let a = builder.integer_literal(1, Type::I64);
    let p = object(&mut builder, Type::ObjectPointer);
    let result = builder.apply(callee, &[a, p], SilType::object(Type::I64));
    builder.ret(Some(result));
    let module = mb.build();

    let report = verify_module(&module, &full());
    assert_eq!(codes(&report), vec![DiagnosticCode::CallArityMismatch]);
    assert_eq!(messages(&report), vec!["apply argument count mismatch"]);
    assert_eq!(report.diagnostics[0].kind(), ViolationKind::Shape);
    assert_eq!(report.diagnostics[0].notes[0].message, "expected 3, found 2");
}

#[test]
fn apply_reports_each_argument_and_result() {
    let report = check_body(|b, tys| {
        let callee = b.insert_inst(
            ConstantRef::new("inc".to_string()),
            SilType::object(tys.int_to_int),
        );
        let flag = b.integer_literal(0, Type::I1);
        b.apply(callee, &[flag], SilType::object(Type::I1));
    });
    assert_eq!(
        codes(&report),
        vec![
            DiagnosticCode::CallArgTypeMismatch,
            DiagnosticCode::CallResultTypeMismatch,
        ]
    );
    assert_eq!(
        report.diagnostics[0].notes[0].message,
        "argument 0: expected $Builtin.Int64, found $Builtin.Int1"
    );

    let report = check_body(|b, tys| {
        let callee = slot(b, tys.int_to_int);
        let value = int(b);
        b.apply(callee, &[value], SilType::object(Type::I64));

        let not_a_func = int(b);
        b.apply(not_a_func, &[], SilType::object(Type::I64));
    });
    assert_eq!(
        messages(&report),
        vec![
            "apply callee must not be an address",
            "apply callee must have a concrete function type",
        ]
    );
}

#[test]
fn apply_with_indirect_return() {
    let report = check_body(|b, tys| {
        let callee_ty = b
            .ctx
            .with_ty_store_mut(|s| s.make_func(Type::I64, tys.arch));
        let callee = b.insert_inst(
            ConstantRef::new("make".to_string()),
            SilType::object(callee_ty),
        );
        let value = int(b);
        let out = slot(b, tys.arch);
        b.apply(callee, &[value, out], SilType::object(tys.unit));
    });
    assert!(report.is_ok(), "{report}");
}

#[test]
fn retain_of_address() {
    let report = check_body(|b, _| {
        let var = slot(b, Type::ObjectPointer);
        b.retain(var);
    });
    assert_eq!(messages(&report), vec!["retain operand must not be an address"]);
    assert_eq!(codes(&report), vec![DiagnosticCode::InstOperandTypeMismatch]);
}

#[test]
fn store_then_load_keeps_the_object_type() {
    let report = check_body(|b, _| {
        let var = slot(b, Type::I64);
        let value = int(b);
        b.store(value, var);
        let loaded = b.load(var);
        assert_eq!(b.value_ty(loaded), b.value_ty(value));
        assert_eq!(b.value_ty(var).object_type(), b.value_ty(loaded));
        assert_eq!(b.value_ty(loaded).address_type(), b.value_ty(var));
    });
    assert!(report.is_ok(), "{report}");

    let report = check_body(|b, _| {
        let var = slot(b, Type::I64);
        let flag = b.integer_literal(1, Type::I1);
        b.store(flag, var);
        b.insert_inst(Load::new(var), SilType::object(Type::I1));
    });
    assert_eq!(
        messages(&report),
        vec![
            "store source must be the object type of its destination",
            "load result must be the object type of its operand",
        ]
    );
    assert!(report
        .iter()
        .all(|diagnostic| diagnostic.kind() == ViolationKind::TypeMismatch));
}

#[test]
fn memory_rules() {
    run_cases(vec![
        case(
            "alloc_var",
            |b, _| {
                b.insert_inst(AllocVar::new(), SilType::object(Type::I64));
            },
            &["alloc_var result must be an address"],
        ),
        case(
            "alloc_ref",
            |b, tys| {
                b.insert_inst(AllocRef::new(), SilType::address(tys.class));
                b.insert_inst(AllocRef::new(), SilType::object(Type::I64));
            },
            &[
                "alloc_ref result must not be an address",
                "alloc_ref result must have reference semantics",
            ],
        ),
        case(
            "load",
            |b, _| {
                let var = slot(b, Type::I64);
                b.insert_inst(Load::new(var), SilType::address(Type::I64));
            },
            &[
                "load result must not be an address",
                "load result must be the object type of its operand",
            ],
        ),
        case(
            "store",
            |b, _| {
                let var = slot(b, Type::I64);
                let flag = b.integer_literal(1, Type::I1);
                b.store(flag, var);
                b.store(var, var);
            },
            &[
                "store source must be the object type of its destination",
                "store source must not be an address",
                "store source must be the object type of its destination",
            ],
        ),
        case(
            "store_to_value",
            |b, _| {
                let value = int(b);
                let other = int(b);
                b.store(value, other);
            },
            &["store destination must be an address"],
        ),
        case(
            "copy_addr",
            |b, _| {
                let src = slot(b, Type::I64);
                let dest = slot(b, Type::I1);
                let value = int(b);
                b.insert_inst_no_result(CopyAddr::new(src, dest, false, true));
                b.insert_inst_no_result(CopyAddr::new(value, src, true, false));
            },
            &[
                "copy_addr source and destination types must match",
                "copy_addr source must be an address",
                "copy_addr source and destination types must match",
            ],
        ),
        case(
            "copy_addr_to_value",
            |b, _| {
                let src = slot(b, Type::I64);
                let value = int(b);
                b.insert_inst_no_result(CopyAddr::new(src, value, false, false));
            },
            &[
                "copy_addr destination must be an address",
                "copy_addr source and destination types must match",
            ],
        ),
        case(
            "zero_addr",
            |b, _| {
                let value = int(b);
                b.insert_inst_no_result(ZeroAddr::new(value));
            },
            &["zero_addr destination must be an address"],
        ),
        case(
            "dealloc",
            |b, tys| {
                let value = int(b);
                b.insert_inst_no_result(DeallocVar::new(value));
                let node = slot(b, tys.class);
                b.insert_inst_no_result(DeallocRef::new(node));
                b.insert_inst_no_result(DeallocRef::new(value));
            },
            &[
                "dealloc_var operand must be an address",
                "dealloc_ref operand must not be an address",
                "dealloc_ref operand must have reference semantics",
            ],
        ),
        case(
            "destroy_addr",
            |b, tys| {
                let generic = slot(b, tys.arch);
                b.insert_inst_no_result(DestroyAddr::new(generic));
                let var = slot(b, Type::I64);
                b.insert_inst_no_result(DestroyAddr::new(var));
            },
            &["destroy_addr operand must be address-only"],
        ),
        case(
            "index_addr",
            |b, _| {
                let var = slot(b, Type::I64);
                b.insert_inst(IndexAddr::new(var, 1), SilType::address(Type::I64));
                b.insert_inst(IndexAddr::new(var, 2), SilType::object(Type::I64));
            },
            &[
                "index_addr result must be an address",
                "index_addr result type must match its operand",
            ],
        ),
        case(
            "element_addr",
            |b, tys| {
                let pair = object(b, tys.pair);
                b.insert_inst(ElementAddr::new(pair, 0), SilType::object(Type::I64));
                let node = slot(b, tys.class);
                b.insert_inst(ElementAddr::new(node, 0), SilType::address(Type::I64));
            },
            &[
                "element_addr operand must be an address",
                "element_addr result must be an address",
                "element_addr operand must not have reference semantics",
            ],
        ),
        case(
            "ref_element_addr",
            |b, tys| {
                let node = object(b, tys.class);
                b.insert_inst(RefElementAddr::new(node, 0), SilType::address(Type::I64));
                let pair = object(b, tys.pair);
                b.insert_inst(RefElementAddr::new(pair, 1), SilType::object(Type::I1));
            },
            &[
                "ref_element_addr operand must have reference semantics",
                "ref_element_addr result must be an address",
            ],
        ),
        case(
            "ref_element_addr_of_address",
            |b, tys| {
                let node = slot(b, tys.class);
                b.insert_inst(RefElementAddr::new(node, 0), SilType::address(Type::I64));
            },
            &["ref_element_addr operand must not be an address"],
        ),
        case(
            "release",
            |b, tys| {
                let node = object(b, tys.class);
                b.release(node);
                let value = int(b);
                b.release(value);
            },
            &["release operand must have reference semantics"],
        ),
        case(
            "release_of_address",
            |b, _| {
                let var = slot(b, Type::ObjectPointer);
                b.release(var);
            },
            &["release operand must not be an address"],
        ),
    ]);
}

#[test]
fn data_rules() {
    run_cases(vec![
        case(
            "integer",
            |b, tys| {
                b.integer_literal(1, Type::ObjectPointer);
                b.insert_inst(IntegerValue::new(2), SilType::object(tys.class));
                b.insert_inst(IntegerValue::new(3), SilType::object(Type::I8));
            },
            &[
                "integer_literal result must be a builtin integer",
                "integer_value result must be a builtin integer",
            ],
        ),
        case(
            "zero_value",
            |b, _| {
                b.insert_inst(ZeroValue::new(), SilType::address(Type::I64));
            },
            &["zero_value result must not be an address"],
        ),
        case(
            "constant_ref",
            |b, tys| {
                b.insert_inst(
                    ConstantRef::new("id".to_string()),
                    SilType::object(tys.poly),
                );
                b.insert_inst(
                    ConstantRef::new("answer".to_string()),
                    SilType::object(Type::I64),
                );
            },
            &["constant_ref result must have a function type"],
        ),
        case(
            "tuple",
            |b, tys| {
                let value = int(b);
                b.insert_inst(Tuple::new(smallvec![value]), SilType::object(tys.pair));
                b.insert_inst(Tuple::new(smallvec![value]), SilType::object(Type::I64));
            },
            &[
                "tuple element count must match its tuple type",
                "tuple result must have a tuple type",
            ],
        ),
        case(
            "extract",
            |b, tys| {
                let pair = object(b, tys.pair);
                b.insert_inst(Extract::new(pair, 0), SilType::object(Type::I64));
                let node = object(b, tys.class);
                b.insert_inst(Extract::new(node, 0), SilType::address(Type::I64));
            },
            &[
                "extract operand must not have reference semantics",
                "extract result must not be an address",
            ],
        ),
        case(
            "extract_from_address",
            |b, tys| {
                let pair = slot(b, tys.pair);
                b.insert_inst(Extract::new(pair, 0), SilType::object(Type::I64));
            },
            &["extract operand must not be an address"],
        ),
        case(
            "metatype",
            |b, tys| {
                b.insert_inst(Metatype::new(), SilType::object(tys.arch_meta));
                b.insert_inst(Metatype::new(), SilType::object(tys.arch));
            },
            &["metatype result must be a metatype"],
        ),
        case(
            "associated_metatype",
            |b, tys| {
                let meta = b.insert_inst(Metatype::new(), SilType::object(tys.arch_meta));
                b.insert_inst(
                    AssociatedMetatype::new(meta, "Element".to_string()),
                    SilType::object(tys.int_meta),
                );
                let value = int(b);
                b.insert_inst(
                    AssociatedMetatype::new(value, "Element".to_string()),
                    SilType::object(Type::I64),
                );
            },
            &[
                "associated_metatype result must be a metatype",
                "associated_metatype operand must be a metatype",
            ],
        ),
        case(
            "specialize",
            |b, tys| {
                let poly = b.insert_inst(
                    ConstantRef::new("id".to_string()),
                    SilType::object(tys.poly),
                );
                b.insert_inst(Specialize::new(poly), SilType::object(tys.int_to_int));
                let concrete = b.insert_inst(
                    ConstantRef::new("inc".to_string()),
                    SilType::object(tys.int_to_int),
                );
                b.insert_inst(Specialize::new(concrete), SilType::object(tys.poly));
            },
            &[
                "specialize result must have a concrete function type",
                "specialize operand must have a polymorphic function type",
            ],
        ),
    ]);
}

#[test]
fn existential_rules() {
    run_cases(vec![
        case(
            "archetype_method",
            |b, tys| {
                let generic = slot(b, tys.arch);
                b.insert_inst(
                    ArchetypeMethod::new(generic, "size".to_string()),
                    SilType::object(tys.arch_method),
                );
                let meta = b.insert_inst(Metatype::new(), SilType::object(tys.arch_meta));
                b.insert_inst(
                    ArchetypeMethod::new(meta, "make".to_string()),
                    SilType::object(tys.arch_meta_method),
                );

                let var = slot(b, Type::I64);
                b.insert_inst(
                    ArchetypeMethod::new(var, "size".to_string()),
                    SilType::object(tys.arch_method),
                );
                let int_meta = b.insert_inst(Metatype::new(), SilType::object(tys.int_meta));
                b.insert_inst(
                    ArchetypeMethod::new(int_meta, "make".to_string()),
                    SilType::object(tys.int_meta_method),
                );
                b.insert_inst(
                    ArchetypeMethod::new(generic, "size".to_string()),
                    SilType::object(tys.int_to_int),
                );
            },
            &[
                "archetype_method result input must match its operand",
                "archetype_method operand must be an archetype address",
                "archetype_method operand must be the metatype of an archetype",
                "archetype_method result must return a function",
                "archetype_method result input must match its operand",
            ],
        ),
        case(
            "protocol_method",
            |b, tys| {
                let container = slot(b, tys.proto);
                b.insert_inst(
                    ProtocolMethod::new(container, "draw".to_string()),
                    SilType::object(tys.proto_method),
                );
                let value = object(b, tys.proto);
                b.insert_inst(
                    ProtocolMethod::new(value, "draw".to_string()),
                    SilType::object(tys.arch_method),
                );
            },
            &[
                "protocol_method result input must be a raw pointer",
                "protocol_method operand must be an address",
            ],
        ),
        case(
            "project_existential",
            |b, tys| {
                let container = slot(b, tys.proto);
                b.insert_inst(
                    ProjectExistential::new(container),
                    SilType::object(Type::RawPointer),
                );
                let var = slot(b, Type::I64);
                b.insert_inst(ProjectExistential::new(var), SilType::object(Type::RawPointer));
            },
            &["project_existential operand must be existential"],
        ),
        case(
            "init_existential",
            |b, tys| {
                let container = slot(b, tys.proto);
                b.insert_inst(
                    InitExistential::new(container, Type::I64),
                    SilType::address(Type::I64),
                );
                let node = slot(b, tys.class);
                b.insert_inst(
                    InitExistential::new(node, Type::I64),
                    SilType::address(Type::I64),
                );
            },
            &["init_existential operand must be existential"],
        ),
        case(
            "deinit_existential",
            |b, tys| {
                let container = slot(b, tys.proto);
                b.insert_inst_no_result(DeinitExistential::new(container));
                let value = int(b);
                b.insert_inst_no_result(DeinitExistential::new(value));
            },
            &[
                "deinit_existential operand must be an address",
                "deinit_existential operand must be existential",
            ],
        ),
        case(
            "archetype_to_super",
            |b, tys| {
                let generic = slot(b, tys.arch);
                b.insert_inst(ArchetypeToSuper::new(generic), SilType::object(tys.class));
                let bounded = slot(b, tys.bounded_arch);
                b.insert_inst(ArchetypeToSuper::new(bounded), SilType::object(Type::I64));
            },
            &[
                "archetype_to_super operand must be address-only",
                "archetype_to_super result must have reference semantics",
            ],
        ),
        case(
            "archetype_to_super_of_existential",
            |b, tys| {
                let container = slot(b, tys.proto);
                b.insert_inst(ArchetypeToSuper::new(container), SilType::object(tys.class));
            },
            &["archetype_to_super operand must be an archetype"],
        ),
        case(
            "super_to_archetype",
            |b, tys| {
                let node = object(b, tys.class);
                let generic = slot(b, tys.arch);
                b.insert_inst_no_result(SuperToArchetype::new(node, generic));
                let value = int(b);
                b.insert_inst_no_result(SuperToArchetype::new(value, node));
            },
            &[
                "super_to_archetype source must have reference semantics",
                "super_to_archetype destination must be an address",
                "super_to_archetype destination must be an archetype",
            ],
        ),
        case(
            "downcast",
            |b, tys| {
                let node = object(b, tys.class);
                b.insert_inst(Downcast::new(node), SilType::object(tys.class));
                let value = int(b);
                b.insert_inst(Downcast::new(value), SilType::object(Type::I64));
            },
            &[
                "downcast operand must have reference semantics",
                "downcast result must have reference semantics",
            ],
        ),
    ]);
}

#[test]
#[should_panic(expected = "neither an address nor a metatype")]
fn archetype_method_on_plain_value_is_unreachable() {
    check_body(|b, tys| {
        let value = int(b);
        b.insert_inst(
            ArchetypeMethod::new(value, "size".to_string()),
            SilType::object(tys.arch_method),
        );
    });
}

#[test]
fn control_flow_operands_must_be_present() {
    let report = check_body(|b, _| {
        let next = b.append_block();
        b.insert_inst_no_result(CondBranch::new(
            None,
            next,
            smallvec![],
            next,
            smallvec![],
        ));
        b.switch_to_block(next);
        b.insert_inst_no_result(Return::new(None));
        let after = b.append_block();
        b.switch_to_block(after);
    });

    assert_eq!(
        messages(&report),
        vec!["cond_br condition must be present", "return value must be present"]
    );
    assert!(report
        .iter()
        .all(|diagnostic| diagnostic.code == DiagnosticCode::MissingOperand));
}

#[test]
fn result_map_is_checked() {
    let report = check_body(|b, _| {
        let var = slot(b, Type::I64);
        let value = int(b);
        b.insert_inst(Store::new(value, var), SilType::object(Type::I64));
        b.insert_inst_no_result(AllocVar::new());
    });

    assert_eq!(
        messages(&report),
        vec![
            "instruction must not produce a result value",
            "instruction is expected to produce a result value",
        ]
    );
    assert!(report
        .iter()
        .all(|diagnostic| diagnostic.code == DiagnosticCode::InstResultMapBroken));
}

#[test]
fn dangling_references() {
    fn body(b: &mut FunctionBuilder<'_>, _: &Types) {
        b.insert_inst(
            Load::new(ValueId(999)),
            SilType::object(Type::I64),
        );
        let detached = b.make_block();
        let next = b.append_block();
        let value = int(b);
        b.cond_br(value, detached, BlockId(42));
        b.switch_to_block(next);
    }

    let report = check_body(body);
    assert_eq!(
        codes(&report),
        vec![
            DiagnosticCode::InvalidValueRef,
            DiagnosticCode::BranchToMissingBlock,
            DiagnosticCode::BranchToMissingBlock,
        ]
    );
    let notes: Vec<_> = report
        .iter()
        .map(|diagnostic| diagnostic.notes[0].message.as_str())
        .collect();
    assert_eq!(
        notes,
        vec![
            "%999 is not defined",
            "bb1 is not placed in the layout",
            "bb42 is not a block of this function",
        ]
    );

    let fast = VerifierConfig::for_level(VerificationLevel::Fast);
    assert!(check_body_with(&fast, body).is_ok());
}

#[test]
fn branch_arguments_at_full_level() {
    fn body(b: &mut FunctionBuilder<'_>, _: &Types) {
        let target = b.append_block();
        let flag = b.integer_literal(1, Type::I1);
        b.br(target, &[flag]);

        b.switch_to_block(target);
        b.append_block_param(target, SilType::object(Type::I64));
        let join = b.append_block();
        b.br(join, &[]);

        b.switch_to_block(join);
        b.append_block_param(join, SilType::object(Type::I64));
    }

    let report = check_body(body);
    assert_eq!(
        codes(&report),
        vec![
            DiagnosticCode::BranchArgTypeMismatch,
            DiagnosticCode::BranchArgCountMismatch,
        ]
    );

    let standard = VerifierConfig::for_level(VerificationLevel::Standard);
    assert!(check_body_with(&standard, body).is_ok());
}

#[test]
fn levels_gate_checks() {
    let mut mb = TestModuleBuilder::new();
    let unit = mb.ctx().unit_type();
    let ty = mb.module_builder().declare_func_type(unit, unit);
    let mut builder = mb.func_builder("mixed", ty);
    let entry = builder.append_block();
    builder.switch_to_block(entry);
    let value = builder.integer_literal(1, Type::I64);
    builder.load(value);
    let module = mb.build();

    let fast = verify_module(&module, &VerifierConfig::for_level(VerificationLevel::Fast));
    assert_eq!(codes(&fast), vec![DiagnosticCode::MissingTerminator]);

    let standard = verify_module(&module, &VerifierConfig::default());
    assert_eq!(
        codes(&standard),
        vec![
            DiagnosticCode::MissingTerminator,
            DiagnosticCode::InstOperandTypeMismatch,
        ]
    );

    let disabled = VerifierConfig {
        enabled: false,
        ..VerifierConfig::default()
    };
    assert!(verify_module(&module, &disabled).is_ok());
}

#[test]
fn diagnostic_limit() {
    fn body(b: &mut FunctionBuilder<'_>, _: &Types) {
        let value = int(b);
        for _ in 0..5 {
            b.retain(value);
        }
    }

    let capped = VerifierConfig {
        max_diagnostics: 3,
        ..VerifierConfig::default()
    };
    assert_eq!(check_body_with(&capped, body).len(), 3);

    let unlimited = VerifierConfig {
        max_diagnostics: 0,
        ..VerifierConfig::default()
    };
    assert_eq!(check_body_with(&unlimited, body).len(), 5);
}

#[test]
fn module_reports_follow_function_order() {
    let mut mb = TestModuleBuilder::new();
    let unit = mb.ctx().unit_type();
    let ty = mb.module_builder().declare_func_type(unit, unit);

    let mut func_refs = Vec::new();
    for name in ["a", "b", "c", "d"] {
        let mut builder = mb.func_builder(name, ty);
        let entry = builder.append_block();
        builder.switch_to_block(entry);
        builder.insert_inst(AllocVar::new(), SilType::object(Type::I64));
        func_refs.push(mb.func_ref().unwrap());
    }
    let module = mb.build();

    let report = verify_module(&module, &VerifierConfig::default());
    let funcs: Vec<_> = report
        .iter()
        .filter_map(|diagnostic| diagnostic.primary.func())
        .collect();
    let expected: Vec<_> = func_refs
        .iter()
        .flat_map(|func_ref| [*func_ref, *func_ref])
        .collect();
    assert_eq!(funcs, expected);

    let capped = VerifierConfig {
        max_diagnostics: 3,
        ..VerifierConfig::default()
    };
    let report = verify_module(&module, &capped);
    assert_eq!(report.len(), 3);
    assert_eq!(report.diagnostics[2].primary.func(), Some(func_refs[1]));
}

#[test]
fn diagnostics_carry_context() {
    let mut mb = TestModuleBuilder::new();
    let unit = mb.ctx().unit_type();
    let ty = mb.module_builder().declare_func_type(unit, unit);
    let mut builder = mb.func_builder("leak", ty);
    let entry = builder.append_block();
    builder.switch_to_block(entry);
    let var = builder.insert_inst(AllocVar::new(), SilType::address(Type::ObjectPointer));
    builder.retain(var);
    let unit_value = builder.insert_inst(Tuple::new(smallvec![]), SilType::object(unit));
    builder.ret(Some(unit_value));
    let module = mb.build();

    let report = verify_module(&module, &VerifierConfig::default());
    insta::assert_snapshot!(report.to_string(), @r"
    error [IR0600] retain operand must not be an address @ func0:bb0:inst1 (@leak, retain %0)
      note: found $*Builtin.ObjectPointer
    ");
    assert!(report.diagnostics[0].snippet.is_none());

    let report = verify_module(&module, &full());
    assert_eq!(
        report.diagnostics[0].snippet.as_deref(),
        Some(concat!(
            "  bb0:\n",
            "    %0 = alloc_var : $*Builtin.ObjectPointer\n",
            "  > retain %0\n",
            "    %1 = tuple () : $()\n",
            "    return %1\n",
        ))
    );
}

#[test]
fn build_verified_returns_report() {
    let mut mb = ModuleBuilder::new(ModuleCtx::new());
    let unit = mb.unit_type();
    let ty = mb.declare_func_type(unit, unit);
    let func_ref = mb.declare_function(Signature::new("open", SilType::object(ty)));
    let mut builder = mb.func_builder(func_ref);
    let entry = builder.append_block();
    builder.switch_to_block(entry);
    builder.insert_inst(AllocVar::new(), SilType::address(Type::I64));

    let report = mb.build_verified(&VerifierConfig::default()).unwrap_err();
    assert_eq!(codes(&report), vec![DiagnosticCode::MissingTerminator]);

    let mut mb = ModuleBuilder::new(ModuleCtx::new());
    let unit = mb.unit_type();
    let ty = mb.declare_func_type(unit, unit);
    let func_ref = mb.declare_function(Signature::new("closed", SilType::object(ty)));
    let mut builder = mb.func_builder(func_ref);
    let entry = builder.append_block();
    builder.switch_to_block(entry);
    let unit_value = builder.insert_inst(Tuple::new(smallvec![]), SilType::object(unit));
    builder.ret(Some(unit_value));

    let module = build_and_verify(mb, &full()).unwrap();
    assert_eq!(module.lookup_func("closed"), Some(func_ref));
}
