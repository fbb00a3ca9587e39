use bucketsat::config::SolverConfigUpdate;
use bucketsat::order::EliminationOrder;
use bucketsat::solver::Solver;

use bucketsat_formula::test::brute_force_sat;

macro_rules! test_cnf {
    ($name:ident, $result:expr) => {
        #[test]
        fn $name() {
            let _ = env_logger::builder().is_test(true).try_init();
            let cnf = include_bytes!(concat!("cnfs/", stringify!($name), ".cnf"));
            let formula =
                bucketsat::dimacs::DimacsParser::parse(&cnf[..]).expect("parsing failed");
            let result = $result;
            assert_eq!(brute_force_sat(&formula), result);

            for &order in [EliminationOrder::Descending, EliminationOrder::Ascending].iter() {
                for &workers in [1, 3].iter() {
                    let mut solver = Solver::new();
                    solver
                        .config(&SolverConfigUpdate {
                            elimination_order: Some(order),
                            worker_count: Some(workers),
                            ..SolverConfigUpdate::new()
                        })
                        .expect("config failed");
                    solver
                        .add_dimacs_cnf(&cnf[..])
                        .expect("loading failed");
                    assert_eq!(solver.solve().expect("solve failed"), result);
                }
            }
        }
    };
}

test_cnf!(unit_resolution_sat, true);
test_cnf!(complementary_units_unsat, false);
test_cnf!(all_signs_unsat, false);
test_cnf!(pigeonhole_3_2_unsat, false);
test_cnf!(pigeonhole_2_2_sat, true);
test_cnf!(implication_chain_sat, true);
test_cnf!(implication_chain_unsat, false);
test_cnf!(tautologies_and_duplicates_sat, true);

#[test]
fn malformed_input_is_rejected() {
    let mut solver = Solver::new();
    assert!(solver.add_dimacs_cnf(&b"p cnf 2 1\n1 3 0\n"[..]).is_err());

    let mut solver = Solver::new();
    assert!(solver.add_dimacs_cnf(&b"1 2 0\n"[..]).is_err());
}
