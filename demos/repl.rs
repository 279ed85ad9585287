//! Interactive driver for manual exploration of a domain: a thin top-level
//! binary, excluded from the core's own scope, that performs I/O and
//! logging and contains no planning logic itself. Lists and executes
//! ground actions one `reedline` command at a time; there's no
//! surface-syntax parser here to read arbitrary action terms from a line of
//! text, so the domain/problem driven by the REPL is bundled in.

use adl_core::connective::{AND, NOT};
use adl_core::domain::{ActionSchema, Domain, FuncSig};
use adl_core::problem::{initstate, Problem};
use adl_core::state::State;
use adl_core::term::Term;
use adl_core::{available, execute};
use anyhow::{Context, Result};
use reedline::{DefaultPrompt, Reedline, Signal};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("==================================================");
    println!(" ADL grounding/interpretation core - demo REPL");
    println!("==================================================");

    let (domain, problem) = load_demo_problem().context("building bundled demo problem")?;
    let mut state = initstate(&problem);

    println!("Loaded demo domain `{}` with {} declared object(s).", domain.name, problem.objects.len());
    println!("Commands: :state  :avail  :do <n>  :quit");

    let mut line_editor = Reedline::create();
    let prompt = DefaultPrompt::default();

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => {
                let input = buffer.trim();
                if input.is_empty() {
                    continue;
                }
                match input {
                    ":quit" | ":q" => break,
                    ":state" => print_state(&domain, &state),
                    ":avail" => print_available(&domain, &state)?,
                    other if other.starts_with(":do ") => {
                        let idx: usize = match other[4..].trim().parse() {
                            Ok(i) => i,
                            Err(_) => {
                                println!("usage: :do <index from :avail>");
                                continue;
                            }
                        };
                        match do_action(&domain, &state, idx) {
                            Ok(next) => {
                                state = next;
                                tracing::info!(index = idx, "transitioned to new state");
                                print_state(&domain, &state);
                            }
                            Err(e) => println!("error: {e}"),
                        }
                    }
                    _ => println!("unrecognized command (try :state, :avail, :do <n>, :quit)"),
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Aborting.");
                break;
            }
            Err(err) => {
                println!("input error: {err:?}");
                break;
            }
        }
    }
    Ok(())
}

fn print_state(domain: &Domain, state: &State) {
    println!("facts:");
    for f in &state.facts {
        println!("  {}", render(domain, f));
    }
}

fn print_available(domain: &Domain, state: &State) -> Result<()> {
    let acts = available(domain, state)?;
    if acts.is_empty() {
        println!("(no actions available)");
    }
    for (i, ga) in acts.iter().enumerate() {
        println!("  [{i}] {}", render(domain, &ga.term));
    }
    Ok(())
}

fn do_action(domain: &Domain, state: &State, idx: usize) -> Result<State> {
    let acts = available(domain, state)?;
    let ga = acts.get(idx).context("no such available action")?;
    Ok(execute(domain, state, ga)?)
}

fn render(domain: &Domain, term: &Term) -> String {
    match term {
        Term::Var(v) => format!("?{}", domain.resolve(*v)),
        Term::Const(name, _) => domain.resolve(*name),
        Term::Compound(name, args) => {
            let rendered_args: Vec<String> = args.iter().map(|a| render(domain, a)).collect();
            format!("{}({})", domain.resolve(*name), rendered_args.join(", "))
        }
    }
}

/// A small blocks-world domain/problem, bundled so the REPL has something to
/// drive without a parser: `a` stacked on `b` on the table, one `pickup`
/// schema.
fn load_demo_problem() -> Result<(Domain, Problem)> {
    let mut domain = Domain::new("blocks-demo");
    let block = domain.intern("block");
    let clear = domain.intern("clear");
    let ontable = domain.intern("ontable");
    let handempty = domain.intern("handempty");
    let holding = domain.intern("holding");
    domain.predicates.insert(clear, FuncSig { argtypes: vec![block] });
    domain.predicates.insert(ontable, FuncSig { argtypes: vec![block] });
    domain.predicates.insert(handempty, FuncSig { argtypes: vec![] });
    domain.predicates.insert(holding, FuncSig { argtypes: vec![block] });

    let pickup = domain.intern("pickup");
    let x = domain.intern("?x");
    let and = domain.intern(AND);
    let not = domain.intern(NOT);
    let precond = Term::compound(
        and,
        vec![
            Term::compound(clear, vec![Term::Var(x)]),
            Term::compound(ontable, vec![Term::Var(x)]),
            Term::atom(handempty),
        ],
    );
    let effect = Term::compound(
        and,
        vec![
            Term::compound(not, vec![Term::compound(ontable, vec![Term::Var(x)])]),
            Term::compound(not, vec![Term::compound(clear, vec![Term::Var(x)])]),
            Term::compound(not, vec![Term::atom(handempty)]),
            Term::compound(holding, vec![Term::Var(x)]),
        ],
    );
    domain.actions.push(ActionSchema { name: pickup, params: vec![(x, block)], precond, effect });

    let a = domain.intern("a");
    let b = domain.intern("b");
    let mut problem = Problem::new("demo", Term::compound(holding, vec![Term::atom(a)]));
    problem.objects.push((a, block));
    problem.objects.push((b, block));
    problem.init_facts.insert(Term::compound(clear, vec![Term::atom(a)]));
    problem.init_facts.insert(Term::compound(ontable, vec![Term::atom(a)]));
    problem.init_facts.insert(Term::compound(ontable, vec![Term::atom(b)]));
    problem.init_facts.insert(Term::atom(handempty));

    Ok((domain, problem))
}
