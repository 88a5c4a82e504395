//! The canonical lesson table
//!
//! Eleven lessons run in a fixed order on one `main` frame. Each lesson has a
//! title, a block of commentary (shown with [`Narration::Explained`]) and the
//! instructions whose printed output is the lesson's observable effect.
//!
//! The table is the only edition. Wording changes belong here, not in the
//! interpreter.

use super::ast::{BindingKind, Expr, FunctionDef, Instruction, Param, Place};
use crate::interpreter::constants::{
    CALLEE_LITERAL, HEAP_LITERAL, INITIAL_VALUE, MULTIPLIER, WRITE_THROUGH_LITERAL,
};
use std::fmt;

pub const SET_VALUE_TO_FIVE: &str = "set_value_to_five";
pub const SET_POINTER_VALUE_TO_FIVE: &str = "set_pointer_value_to_five";
pub const SET_VALUE_TO_FIVE_WITH_REFERENCE: &str = "set_value_to_five_with_reference";

/// The eleven lessons, in running order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LessonId {
    DeclareAndPrint,
    MutateInPlace,
    ShowAddress,
    DeclarePointer,
    BindPointer,
    DerefRead,
    DerefWrite,
    PassByValue,
    PassByPointer,
    PassByReference,
    HeapAllocate,
}

impl LessonId {
    pub const ALL: [LessonId; 11] = [
        LessonId::DeclareAndPrint,
        LessonId::MutateInPlace,
        LessonId::ShowAddress,
        LessonId::DeclarePointer,
        LessonId::BindPointer,
        LessonId::DerefRead,
        LessonId::DerefWrite,
        LessonId::PassByValue,
        LessonId::PassByPointer,
        LessonId::PassByReference,
        LessonId::HeapAllocate,
    ];

    /// 1-based position in the running order
    pub fn number(self) -> usize {
        self as usize + 1
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lesson {}", self.number())
    }
}

/// How much commentary accompanies the printed output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Narration {
    /// Only the lesson output
    #[default]
    Brief,
    /// Title and commentary before each lesson's output
    Explained,
}

#[derive(Debug, Clone)]
pub struct Lesson {
    pub id: LessonId,
    pub title: &'static str,
    pub commentary: &'static [&'static str],
    pub body: Vec<Instruction>,
}

impl Lesson {
    /// Names of the helper functions this lesson calls, in call order
    pub fn called_functions(&self) -> Vec<&str> {
        fn collect<'a>(body: &'a [Instruction], out: &mut Vec<&'a str>) {
            for instruction in body {
                match instruction {
                    Instruction::Call { function, .. } => out.push(function),
                    Instruction::Scope(inner) => collect(inner, out),
                    _ => {}
                }
            }
        }
        let mut names = Vec::new();
        collect(&self.body, &mut names);
        names
    }
}

/// Helper functions plus the lessons that call them
#[derive(Debug, Clone)]
pub struct Script {
    pub functions: Vec<FunctionDef>,
    pub lessons: Vec<Lesson>,
}

impl Script {
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    /// The cheat sheet
    pub fn canonical() -> Self {
        Script {
            functions: helper_functions(),
            lessons: LessonId::ALL.iter().map(|&id| lesson(id)).collect(),
        }
    }
}

fn helper_functions() -> Vec<FunctionDef> {
    vec![
        FunctionDef {
            name: SET_VALUE_TO_FIVE.to_string(),
            param: Param {
                name: "x".to_string(),
                kind: BindingKind::Int,
            },
            body: vec![
                Instruction::print([
                    "set_value_to_five() works on its own copy of x at ".into(),
                    Expr::address_of("x").into(),
                ]),
                Instruction::assign(Place::var("x"), Expr::Int(CALLEE_LITERAL)),
            ],
        },
        FunctionDef {
            name: SET_POINTER_VALUE_TO_FIVE.to_string(),
            param: Param {
                name: "x".to_string(),
                kind: BindingKind::Pointer,
            },
            body: vec![Instruction::assign(
                Place::deref("x"),
                Expr::Int(CALLEE_LITERAL),
            )],
        },
        FunctionDef {
            name: SET_VALUE_TO_FIVE_WITH_REFERENCE.to_string(),
            param: Param {
                name: "x".to_string(),
                kind: BindingKind::Reference,
            },
            body: vec![
                Instruction::print([
                    "set_value_to_five_with_reference() sees x at ".into(),
                    Expr::address_of("x").into(),
                ]),
                Instruction::assign(Place::var("x"), Expr::Int(CALLEE_LITERAL)),
            ],
        },
    ]
}

fn lesson(id: LessonId) -> Lesson {
    use BindingKind::{Int, Pointer};
    use Expr as E;
    use Instruction as I;

    match id {
        LessonId::DeclareAndPrint => Lesson {
            id,
            title: "Declare and print",
            commentary: &[
                "A variable declared by name is synonymous with its value.",
                "If you know JavaScript or another modern language, this is the variable you already know.",
            ],
            body: vec![
                I::declare("number", Int, Some(E::Int(INITIAL_VALUE))),
                I::print([
                    "number is initialized with a value of ".into(),
                    E::var("number").into(),
                ]),
            ],
        },
        LessonId::MutateInPlace => Lesson {
            id,
            title: "Mutate in place",
            commentary: &["The value of the variable can be modified directly: increment, then double."],
            body: vec![
                I::Increment("number".to_string()),
                I::assign(
                    Place::var("number"),
                    E::mul(E::var("number"), E::Int(MULTIPLIER)),
                ),
                I::print([
                    "After modifying number, its value is now ".into(),
                    E::var("number").into(),
                ]),
            ],
        },
        LessonId::ShowAddress => Lesson {
            id,
            title: "Show the address",
            commentary: &[
                "The variable lives in memory at a specific address.",
                "The & operator yields that address. It is only ever displayed, never computed with.",
            ],
            body: vec![I::print([
                "number's memory address is ".into(),
                E::address_of("number").into(),
            ])],
        },
        LessonId::DeclarePointer => Lesson {
            id,
            title: "Declare a pointer",
            commentary: &[
                "A pointer is a variable that holds a memory address.",
                "`int *numberPointer;` declares one without a target. Its content is garbage until assigned.",
                "The pointer is a variable itself, so it has an address of its own.",
            ],
            body: vec![
                I::declare("numberPointer", Pointer, None),
                I::print([
                    "The numberPointer points to the memory address ".into(),
                    E::var("numberPointer").into(),
                    ".".into(),
                ]),
                I::print([
                    "The numberPointer's memory address is stored at ".into(),
                    E::address_of("numberPointer").into(),
                    ".".into(),
                ]),
            ],
        },
        LessonId::BindPointer => Lesson {
            id,
            title: "Bind the pointer",
            commentary: &["Assigning &number makes the pointer hold the address of number."],
            body: vec![
                I::assign(Place::var("numberPointer"), E::address_of("number")),
                I::AssertSameAddress {
                    lhs: E::var("numberPointer"),
                    rhs: E::address_of("number"),
                },
                I::print([
                    "The numberPointer points to the memory address `".into(),
                    E::var("numberPointer").into(),
                    "`, which is the memory address of number".into(),
                ]),
            ],
        },
        LessonId::DerefRead => Lesson {
            id,
            title: "Dereference to read",
            commentary: &["The dereference operator * reads the value stored at the address a pointer holds."],
            body: vec![I::print([
                "The variable's value pointed to by numberPointer is ".into(),
                E::deref("numberPointer").into(),
            ])],
        },
        LessonId::DerefWrite => Lesson {
            id,
            title: "Dereference to write",
            commentary: &[
                "The same operator writes through the pointer. Pointer and variable share one slot.",
                "The asterisk both declares a pointer (int *p) and dereferences one (*p = 4).",
            ],
            body: vec![
                I::assign(Place::deref("numberPointer"), E::Int(WRITE_THROUGH_LITERAL)),
                I::print([
                    "The variable's value has been modified using the pointer. The variable's value is now "
                        .into(),
                    E::var("number").into(),
                ]),
            ],
        },
        LessonId::PassByValue => Lesson {
            id,
            title: "Pass by value",
            commentary: &[
                "Arguments are passed by value: the function gets a new variable holding a copy.",
                "Changes inside the function touch the copy. The caller's variable is unchanged.",
            ],
            body: vec![
                I::declare("x", Int, Some(E::Int(INITIAL_VALUE))),
                I::print(["x lives at ".into(), E::address_of("x").into()]),
                I::call(SET_VALUE_TO_FIVE, E::var("x")),
                I::print([
                    "The value of x is ".into(),
                    E::var("x").into(),
                    ", set_value_to_five() did not modify x.".into(),
                ]),
            ],
        },
        LessonId::PassByPointer => Lesson {
            id,
            title: "Pass by pointer",
            commentary: &[
                "A function can take a pointer instead. No duplicate variable is created.",
                "Writing through the pointer changes the caller's variable.",
            ],
            body: vec![
                I::call(SET_POINTER_VALUE_TO_FIVE, E::address_of("x")),
                I::print([
                    "The value of x is ".into(),
                    E::var("x").into(),
                    ", set_pointer_value_to_five() modified x.".into(),
                ]),
            ],
        },
        LessonId::PassByReference => Lesson {
            id,
            title: "Pass by reference",
            commentary: &[
                "A reference parameter (int &x) is an alias of the caller's variable.",
                "Same effect as passing a pointer, without the & at the call site or the * in the body.",
            ],
            body: vec![
                I::assign(Place::var("x"), E::Int(INITIAL_VALUE)),
                I::print(["x is reset to ".into(), E::var("x").into()]),
                I::call(SET_VALUE_TO_FIVE_WITH_REFERENCE, E::var("x")),
                I::print([
                    "The value of x is ".into(),
                    E::var("x").into(),
                    ", set_value_to_five_with_reference() modified x.".into(),
                ]),
            ],
        },
        LessonId::HeapAllocate => Lesson {
            id,
            title: "Allocate on the heap",
            commentary: &[
                "`new int` creates a cell with no name. Only the pointer it returns can reach it.",
                "A pointer declared without a target can be pointed at a fresh cell later.",
                "A closing recap: a new int, a pointer to it, and a second heap cell.",
                "Here the cells belong to the enclosing scope and are released when the scope closes.",
                "The C++ original allocated them and never released them.",
            ],
            body: vec![
                I::Scope(vec![
                    I::declare("aPointer", Pointer, None),
                    I::print([
                        "aPointer has no target yet: ".into(),
                        E::var("aPointer").into(),
                    ]),
                    I::assign(Place::var("aPointer"), E::New),
                    I::assign(Place::deref("aPointer"), E::Int(HEAP_LITERAL)),
                    I::print([
                        "aPointer now points to the heap cell at ".into(),
                        E::var("aPointer").into(),
                    ]),
                    I::declare("b", Int, Some(E::Int(INITIAL_VALUE))),
                    I::print([
                        "b is ".into(),
                        E::var("b").into(),
                        ", stored at ".into(),
                        E::address_of("b").into(),
                    ]),
                    I::declare("c", Pointer, Some(E::address_of("b"))),
                    I::AssertSameAddress {
                        lhs: E::var("c"),
                        rhs: E::address_of("b"),
                    },
                    I::print([
                        "c points to ".into(),
                        E::var("c").into(),
                        ", the address of b".into(),
                    ]),
                    I::declare("a", Pointer, Some(E::New)),
                    I::assign(Place::deref("a"), E::Int(HEAP_LITERAL)),
                    I::print([
                        "a points to the new heap cell at ".into(),
                        E::var("a").into(),
                    ]),
                    I::print(["The heap cell holds ".into(), E::deref("a").into()]),
                ]),
                I::print([
                    "Both heap cells were released when their scope closed (the C++ original leaked them)."
                        .into(),
                ]),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_script_runs_every_lesson_once_in_order() {
        let script = Script::canonical();
        let ids: Vec<_> = script.lessons.iter().map(|l| l.id).collect();
        assert_eq!(ids, LessonId::ALL.to_vec());
        assert!(script.lessons.iter().all(|l| !l.commentary.is_empty()));
    }

    #[test]
    fn helper_parameters_cover_all_passing_styles() {
        let script = Script::canonical();
        let kind = |name| script.function(name).map(|f| f.param.kind);
        assert_eq!(kind(SET_VALUE_TO_FIVE), Some(BindingKind::Int));
        assert_eq!(kind(SET_POINTER_VALUE_TO_FIVE), Some(BindingKind::Pointer));
        assert_eq!(
            kind(SET_VALUE_TO_FIVE_WITH_REFERENCE),
            Some(BindingKind::Reference)
        );
    }

    #[test]
    fn only_passing_lessons_call_helpers() {
        let script = Script::canonical();
        let calls = |id| script.lesson(id).map(|l| l.called_functions());
        assert_eq!(calls(LessonId::PassByValue), Some(vec![SET_VALUE_TO_FIVE]));
        assert_eq!(
            calls(LessonId::PassByReference),
            Some(vec![SET_VALUE_TO_FIVE_WITH_REFERENCE])
        );
        assert_eq!(calls(LessonId::HeapAllocate), Some(vec![]));
    }

    #[test]
    fn lesson_numbers_are_one_based() {
        assert_eq!(LessonId::DeclareAndPrint.number(), 1);
        assert_eq!(LessonId::HeapAllocate.number(), 11);
        assert_eq!(LessonId::PassByValue.to_string(), "lesson 8");
    }
}
