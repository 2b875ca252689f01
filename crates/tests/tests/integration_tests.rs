use cli::driver::execute_str;
use test_each_file::test_each_file;
use tests::parse_case;

test_each_file! { for ["case"] in "./fixtures" => run_fixture }

fn run_fixture([content]: [&str; 1]) {
    let case = parse_case(content);
    let actual = execute_str(&case.query, &case.input)
        .unwrap_or_else(|e| panic!("query failed: {}\nquery: {}", e, case.query));
    assert_eq!(
        actual.trim_end_matches('\n'),
        case.expected.trim_end_matches('\n'),
        "query: {}",
        case.query
    );
}
