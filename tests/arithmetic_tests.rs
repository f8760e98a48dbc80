use ceval::interpreter::Interpreter;
use ceval::memory::value::Value;
use ceval::parser::Parser;
use ceval::RuntimeError;

fn run(source: &str) -> Result<(i64, String), RuntimeError> {
    let mut parser = Parser::new(source).expect("Parser creation failed");
    let program = parser.parse_program().expect("Parsing failed");

    let mut interpreter = Interpreter::new(program)?;
    let status = interpreter.run()?;
    Ok((status, interpreter.sink().output().to_string()))
}

#[test]
fn test_arithmetic_coercion() {
    let source = r#"
    int main() {
        char c = 'a';
        char two = 2;
        int ten = 10;

        printf("Char + Int: %d\n", c + ten);
        printf("Int - Char: %d\n", ten - c);
        printf("Char * Char: %d\n", c * two);
        printf("Char / Int: %d\n", c / 2);

        if (c == 97) {
            printf("Comparison Char == Int: OK\n");
        }
        if (97 == c) {
            printf("Comparison Int == Char: OK\n");
        }
        return 0;
    }
    "#;

    let (_, output) = run(source).expect("Execution failed");
    println!("Interpreter output:\n{}", output);

    assert!(output.contains("Char + Int: 107"));
    assert!(output.contains("Int - Char: -87"));
    assert!(output.contains("Char * Char: 194"));
    assert!(output.contains("Comparison Char == Int: OK"));
    assert!(output.contains("Comparison Int == Char: OK"));
    assert!(output.contains("Char / Int: 48"));
}

#[test]
fn test_mixed_int_float() {
    let source = r#"
    int main() {
        int i = 7;
        float f = 2.0;
        float q = i / f;
        int truncated = i / 2;
        int from_float = 9.99;

        printf("%.2f %d %d\n", q, truncated, from_float);
        printf("%.1f\n", i + 0.5);
        return 0;
    }
    "#;

    let (_, output) = run(source).expect("Execution failed");
    assert_eq!(output, "3.50 3 9\n7.5\n");
}

#[test]
fn test_char_storage_wraps() {
    let source = r#"
    int main() {
        char c = 200;
        char d = 'z' + 10;
        printf("%d %d\n", c, d);
        return 0;
    }
    "#;

    let (_, output) = run(source).expect("Execution failed");
    assert_eq!(output, "-56 -124\n");
}

#[test]
fn test_compound_assignment_keeps_type() {
    let source = r#"
    int main() {
        int total = 1;
        total += 2.9;
        float avg = 10;
        avg /= 4;
        char c = 'A';
        c += 2;
        printf("%d %.2f %c\n", total, avg, c);
        return total;
    }
    "#;

    let (status, output) = run(source).expect("Execution failed");
    assert_eq!(status, 3);
    assert_eq!(output, "3 2.50 C\n");
}

#[test]
fn test_integer_overflow_is_reported() {
    let source = r#"
    int main() {
        int big = 9223372036854775807;
        return big + 1;
    }
    "#;

    assert!(matches!(run(source), Err(RuntimeError::IntegerOverflow { .. })));
}

#[test]
fn test_float_division_by_zero() {
    let source = r#"
    float ratio(float a, float b) { return a / b; }
    "#;
    let program = Parser::new(source).unwrap().parse_program().unwrap();
    let mut interpreter = Interpreter::new(program).unwrap();

    let result = interpreter.evaluate("ratio", vec![Value::Float(1.0), Value::Float(0.0)]);
    assert_eq!(result, Ok(Value::Float(f32::INFINITY)));

    let Ok(Value::Float(nan)) = interpreter.evaluate("ratio", vec![Value::Float(0.0), Value::Int(0)]) else {
        panic!("expected a float result");
    };
    assert!(nan.is_nan());
}
