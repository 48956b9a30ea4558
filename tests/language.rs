use tox::{ToxError, run_source, run_source_captured};

fn assert_output(source: &str, expected: &[&str]) {
    match run_source_captured(source) {
        Ok(lines) => {
            let expected: Vec<String> = expected.iter().map(ToString::to_string).collect();
            assert_eq!(lines, expected, "wrong output for:\n{source}");
        },
        Err(e) => panic!("Script failed:\n{source}\nError: {e}"),
    }
}

fn assert_rejected(source: &str) {
    if run_source(source).is_ok() {
        panic!("Script passed but was expected to fail:\n{source}");
    }
}

#[test]
fn arithmetic_precedence() {
    assert_output("fnc main () >> void { log(1 + 2 * 3) }", &["7"]);
    assert_output("fnc main () >> void { log((1 + 2) * 3) }", &["9"]);
    assert_output("fnc main () >> void { log(10 % 4 + 7 / 2) }", &["5"]);
}

#[test]
fn string_interpolation() {
    assert_output("fnc main () >> void {\n  let name string >> \"world\"\n  log(\"hello, \
                   <%name%>\")\n}",
                  &["hello, world"]);
}

#[test]
fn interpolation_tracks_current_bindings() {
    let source = r#"
fnc greet () >> string { return "<%who%>!" }
let who string >> "first"
fnc main () >> void {
  log(greet())
  who >> "second"
  log(greet())
}
"#;
    assert_output(source, &["first!", "second!"]);
}

#[test]
fn unresolved_interpolation_is_left_alone() {
    assert_output("fnc main () >> void { log(\"hi <%nobody%>\") }", &["hi <%nobody%>"]);
}

#[test]
fn array_mutation_through_alias() {
    let source = r"
fnc main () >> void {
  let xs int[] >> [1,2,3]
  let ys int[] >> xs
  xs[0] >> 99
  log(ys[0])
}
";
    assert_output(source, &["99"]);
}

#[test]
fn struct_methods() {
    let source = r#"
struct User { name string, age int }
fnc User.greet (self User) >> string { return "hi, " + self.name }
fnc main () >> void {
  let u User >> User { name: "andy", age: 22 }
  log(u.greet())
}
"#;
    assert_output(source, &["hi, andy"]);
}

#[test]
fn methods_bind_this_and_mutate_the_receiver() {
    let source = r"
struct Counter { n int }
fnc Counter.bump (self Counter) >> void { self.n >> self.n + 1 }
fnc Counter.get (self Counter) >> int { return this.n }
fnc main () >> void {
  let c Counter >> Counter { n: 0 }
  c.bump()
  c.bump()
  log(c.get())
}
";
    assert_output(source, &["2"]);
}

#[test]
fn for_loop_with_continue_and_break() {
    let source = r"
fnc main () >> void {
  let s int >> 0
  for let i int >> 0 ; i < 10 ; i >> i + 1 {
    if i == 5 { break }
    if i == 2 { continue }
    s >> s + i
  }
  log(s)
}
";
    assert_output(source, &["8"]);
}

#[test]
fn while_loop_with_break() {
    let source = r"
fnc main () >> void {
  let i int >> 0
  while i < 100 {
    i >> i + 1
    if i == 7 { break }
  }
  log(i)
}
";
    assert_output(source, &["7"]);
}

#[test]
fn return_escapes_nested_loops_but_not_the_call() {
    let source = r"
fnc find (limit int) >> int {
  for let i int >> 0 ; i < limit ; i >> i + 1 {
    if i == 3 { return i }
  }
  return -1
}
fnc main () >> void {
  log(find(10))
  log(find(2))
}
";
    assert_output(source, &["3", "-1"]);
}

#[test]
fn elif_and_else_chains() {
    let source = r#"
fnc classify (n int) >> string {
  if n < 0 { return "negative" }
  elif n == 0 { return "zero" }
  elif n < 10 { return "small" }
  else { return "big" }
}
fnc main () >> void {
  log(classify(-4))
  log(classify(0))
  log(classify(7))
  log(classify(40))
}
"#;
    assert_output(source, &["negative", "zero", "small", "big"]);
}

#[test]
fn block_declarations_do_not_leak() {
    let source = r"
fnc main () >> void {
  let x int >> 1
  if true {
    let x int >> 2
    log(x)
  }
  log(x)
}
";
    assert_output(source, &["2", "1"]);
}

#[test]
fn functions_reach_globals_not_caller_locals() {
    let source = r"
let total int >> 0
fnc add (n int) >> void { total >> total + n }
fnc main () >> void {
  add(2)
  add(3)
  log(total)
}
";
    assert_output(source, &["5"]);
}

#[test]
fn recursion() {
    let source = r"
fnc fact (n int) >> int {
  if n == 0 { return 1 }
  return n * fact(n - 1)
}
fnc main () >> void { log(fact(5)) }
";
    assert_output(source, &["120"]);
}

#[test]
fn slices_clamp_their_bounds() {
    let source = r"
fnc main () >> void {
  let xs int[] >> [1,2,3,4]
  log(xs[1:3])
  log(xs[:2])
  log(xs[2:])
  log(xs[:])
  log(xs[2:99])
}
";
    assert_output(source, &["[2, 3]", "[1, 2]", "[3, 4]", "[1, 2, 3, 4]", "[3, 4]"]);
}

#[test]
fn out_of_range_index_reads_nil_and_ignores_writes() {
    let source = r"
fnc main () >> void {
  let xs int[] >> [1,2,3]
  log(xs[9])
  xs[9] >> 5
  log(len(xs))
}
";
    assert_output(source, &["nil", "3"]);
}

#[test]
fn maps_store_and_read_values() {
    let source = r#"
fnc main () >> void {
  let ages :>> map[string] >> int { "andy": 22, "beth": 31 }
  log(ages["andy"])
  ages["carl"] >> 45
  log(ages["carl"])
  log(ages["nobody"])
}
"#;
    assert_output(source, &["22", "45", "nil"]);
}

#[test]
fn maps_of_arrays() {
    let source = r#"
fnc main () >> void {
  let rows :>> map[string] >> int[] { "a": [1,2], "b": [3] }
  log(rows["a"][1])
}
"#;
    assert_output(source, &["2"]);
}

#[test]
fn equality_and_logic() {
    let source = r#"
fnc main () >> void {
  log("a" == "a")
  log(1 == 2)
  log(true && false)
  log(true || false)
  log(!false)
}
"#;
    assert_output(source, &["true", "false", "false", "true", "true"]);
}

#[test]
fn heterogeneous_equality_is_false_not_an_error() {
    let source = r#"
fnc main () >> void {
  log(1 == "1")
  log("x" != 3)
}
"#;
    assert_output(source, &["false", "true"]);
}

#[test]
fn string_concatenation() {
    assert_output("fnc main () >> void { log(\"foo\" + \"bar\") }", &["foobar"]);
}

#[test]
fn empty_array_fits_any_array_type() {
    let source = r"
fnc main () >> void {
  let xs int[] >> []
  log(len(xs))
}
";
    assert_output(source, &["0"]);
}

#[test]
fn any_accepts_every_non_array_value() {
    let source = r#"
fnc show (x any) >> void { log(x) }
fnc main () >> void {
  show(1)
  show("s")
  show(true)
}
"#;
    assert_output(source, &["1", "s", "true"]);
}

#[test]
fn bare_and_nil_returns_in_void_functions() {
    assert_output("fnc main () >> void { return }", &[]);
    assert_output("fnc main () >> void { return nil }", &[]);
}

#[test]
fn division_by_zero_is_nil_not_a_crash() {
    assert_output("fnc main () >> void { log(1 / 0) }", &["nil"]);
    assert_output("fnc main () >> void { log(1 % 0) }", &["nil"]);
}

#[test]
fn builtin_strings_functions() {
    let source = r#"
fnc main () >> void {
  log(strings.toUpper("abc"))
  log(strings.toLower("ABC"))
  log(strings.trim("xxhixx", "x"))
  let parts string[] >> strings.split("a,b,c", ",")
  log(len(parts))
  log(parts[1])
}
"#;
    assert_output(source, &["ABC", "abc", "hi", "3", "b"]);
}

#[test]
fn builtin_bytes_functions() {
    let source = r"
fnc main () >> void {
  let buf int[] >> bytes.make(4)
  log(len(buf))
  let src int[] >> [7, 8]
  log(bytes.copy(buf, src))
  log(buf[0])
  log(bytes.cap(buf))
}
";
    assert_output(source, &["4", "2", "7", "4"]);
}

#[test]
fn stdio_println_joins_arguments() {
    assert_output("fnc main () >> void { stdio.println(1, \"two\", true) }", &["1 two true"]);
}

#[test]
fn file_builtins_roundtrip() {
    let path = std::env::temp_dir().join(format!("tox-io-{}.txt", std::process::id()));
    let p = path.display().to_string();
    let source = format!(r#"
fnc main () >> void {{
  let f int >> file.open("{p}")
  log(file.write(f, "alpha\nbeta"))
  file.close(f)
  let g int >> file.open("{p}")
  log(file.readline(g))
  log(file.read(g))
  file.close(g)
  log(path.exists("{p}"))
  log(file.remove("{p}"))
  log(path.exists("{p}"))
}}
"#);
    assert_output(&source, &["true", "alpha", "beta", "true", "true", "false"]);
}

#[test]
fn type_errors_are_rejected() {
    // Mismatched let.
    assert_rejected("let x int >> \"three\"");
    // Assignment to an undeclared variable.
    assert_rejected("fnc main () >> void { ghost >> 3 }");
    // break outside of a loop.
    assert_rejected("fnc main () >> void { break }");
    // Unknown function.
    assert_rejected("fnc main () >> void { log(missing(1)) }");
    // Wrong arity.
    assert_rejected("fnc f (a int) >> int { return a }\nfnc main () >> void { log(f(1, 2)) }");
    // Value returned from a void function.
    assert_rejected("fnc main () >> void { return 3 }");
    // Missing return value in a non-void function.
    assert_rejected("fnc f () >> int { return }\nfnc main () >> void { log(f()) }");
    // Ordering booleans.
    assert_rejected("fnc main () >> void { log(true < false) }");
    // Ordering across types.
    assert_rejected("fnc main () >> void { log(1 < \"a\") }");
    // Non-bool while condition.
    assert_rejected("fnc main () >> void { while 1 { log(1) } }");
    // String plus int.
    assert_rejected("fnc main () >> void { log(\"a\" + 1) }");
}

#[test]
fn struct_literals_must_match_their_declaration() {
    // Missing field.
    assert_rejected("struct User { name string, age int }\nfnc main () >> void { let u User >> \
                     User { name: \"a\" } }");
    // Extra field.
    assert_rejected("struct User { name string }\nfnc main () >> void { let u User >> User { \
                     name: \"a\", age: 3 } }");
    // Field type mismatch.
    assert_rejected("struct User { age int }\nfnc main () >> void { let u User >> User { age: \
                     \"old\" } }");
    // Unknown struct type.
    assert_rejected("fnc main () >> void { let u Ghost >> Ghost { x: 1 } }");
}

#[test]
fn method_calls_are_checked() {
    // Receiver is not a struct.
    assert_rejected("fnc main () >> void {\n  let n int >> 1\n  log(n.wave())\n}");
    // Unknown method.
    assert_rejected("struct User { name string }\nfnc main () >> void {\n  let u User >> User { \
                     name: \"a\" }\n  log(u.wave())\n}");
}

#[test]
fn parse_errors_accumulate_across_statements() {
    let source = "let >> 1\nlet also bad\nlet x int >> 1";
    match run_source(source) {
        Err(ToxError::Parse(errors)) => assert!(errors.len() >= 2, "{errors:?}"),
        other => panic!("expected parse errors, got {other:?}"),
    }
}

#[test]
fn checking_is_idempotent() {
    let source = "fnc main () >> void { log(1) }";
    let statements = tox::check_source(source).expect("program is well-typed");
    assert!(tox::interpreter::typechecker::core::check(&statements).is_empty());
}

#[test]
fn keywords_are_case_insensitive_end_to_end() {
    assert_output("FNC main () >> void { LOG(2 + 2) }", &["4"]);
}

#[test]
fn top_level_statements_run_in_order_before_main() {
    let source = r"
log(1)
fnc main () >> void { log(3) }
log(2)
";
    assert_output(source, &["1", "2", "3"]);
}

#[test]
fn shadowing_loop_variables_stay_local() {
    let source = r"
fnc main () >> void {
  let i int >> 42
  for let i int >> 0 ; i < 2 ; i >> i + 1 {
    log(i)
  }
  log(i)
}
";
    assert_output(source, &["0", "1", "42"]);
}

#[test]
fn structs_nest() {
    let source = r#"
struct Name { first string, last string }
struct User { name Name, age int }
fnc main () >> void {
  let n Name >> Name { first: "ada", last: "l" }
  let u User >> User { name: n, age: 36 }
  log(u.name.first)
  u.name.first >> "grace"
  log(n.first)
}
"#;
    assert_output(source, &["ada", "grace"]);
}
