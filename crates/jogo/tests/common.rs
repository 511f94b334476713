use std::path::Path;

use jogo::TurtleCmd;

#[derive(Default, Clone)]
pub struct TestCase {
    input: String,
    expected: String,
}

fn exec_one(s: &str) -> Result<Vec<TurtleCmd>, jogo::Error> {
    let mut out: Vec<TurtleCmd> = Vec::new();
    jogo::run(&mut out, dbg!(s))?;
    Ok(out)
}

impl TestCase {
    fn exec(&self) {
        let a = exec_one(&self.input).unwrap();
        let b = exec_one(&self.expected).unwrap();
        assert_eq!(a, b, "{}", self.input);
    }

    fn eval_failure(&self) {
        let err = exec_one(&self.input).unwrap_err();
        assert!(matches!(err, jogo::Error::Eval(_)), "{err:?}");
        assert_eq!(err.to_string(), self.expected.trim());
    }

    fn parse_failure(&self) {
        let mut out: Vec<TurtleCmd> = Vec::new();
        let err = jogo::run(&mut out, &self.input).unwrap_err();
        assert!(
            matches!(err, jogo::Error::Lex(_) | jogo::Error::Parse(_)),
            "{err:?}"
        );
        assert!(out.is_empty());
        assert_eq!(err.to_string(), self.expected.trim());
    }
}

pub fn read_tests(path: impl AsRef<Path>) -> Vec<TestCase> {
    let text = std::fs::read_to_string(path).unwrap();
    let mut ret = Vec::new();
    let mut in_input = true;
    let mut cur = TestCase::default();

    fn separator_line(line: &str, ch: u8) -> bool {
        line.trim().len() >= 2 && line.trim().bytes().all(|c| c == ch)
    }

    for line in text.split_inclusive('\n') {
        if in_input {
            if separator_line(line, b'-') {
                in_input = false;
            } else {
                cur.input += line;
            }
        } else if separator_line(line, b'=') {
            in_input = true;
            ret.push(std::mem::take(&mut cur));
        } else {
            cur.expected += line;
        }
    }
    ret
}

#[test]
fn text_tests() {
    let tests = read_tests("tests/basic.txt");
    assert!(!tests.is_empty());
    for test in tests {
        test.exec();
    }
}

#[test]
fn eval_failures() {
    let tests = read_tests("tests/eval-failures.txt");
    assert!(!tests.is_empty());
    for test in tests {
        test.eval_failure();
    }
}

#[test]
fn parse_failures() {
    let tests = read_tests("tests/parse-failures.txt");
    assert!(!tests.is_empty());
    for test in tests {
        test.parse_failure();
    }
}
