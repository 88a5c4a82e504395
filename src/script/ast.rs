// Instruction set for lesson scripts

/// What a named binding holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Int,
    Pointer,
    Reference,
}

impl BindingKind {
    /// C spelling of the declared type, used by the stack pane
    pub fn c_type(self) -> &'static str {
        match self {
            BindingKind::Int => "int",
            BindingKind::Pointer => "int*",
            BindingKind::Reference => "int&",
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i32),
    Var(String),
    AddressOf(String),
    Deref(String),
    Add(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    /// Pointer that points nowhere
    Null,
    /// Allocate one heap cell and yield a pointer to it
    New,
}

impl Expr {
    pub fn var(name: &str) -> Self {
        Expr::Var(name.to_string())
    }

    pub fn address_of(name: &str) -> Self {
        Expr::AddressOf(name.to_string())
    }

    pub fn deref(name: &str) -> Self {
        Expr::Deref(name.to_string())
    }

    pub fn mul(lhs: Expr, rhs: Expr) -> Self {
        Expr::Mul(Box::new(lhs), Box::new(rhs))
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Expr::Add(Box::new(lhs), Box::new(rhs))
    }
}

/// Assignment targets
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    Var(String),
    Deref(String),
}

impl Place {
    pub fn var(name: &str) -> Self {
        Place::Var(name.to_string())
    }

    pub fn deref(name: &str) -> Self {
        Place::Deref(name.to_string())
    }
}

/// One piece of a printed line
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    Value(Expr),
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::Text(text.to_string())
    }
}

impl From<Expr> for Fragment {
    fn from(expr: Expr) -> Self {
        Fragment::Value(expr)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Declare {
        name: String,
        kind: BindingKind,
        init: Option<Expr>,
    },
    Assign {
        place: Place,
        value: Expr,
    },
    /// `name++`
    Increment(String),
    /// Print one line built from the fragments
    Print(Vec<Fragment>),
    Call {
        function: String,
        arg: Expr,
    },
    /// Nested block; bindings and heap cells created inside die at its end
    Scope(Vec<Instruction>),
    /// Internal check that two pointer expressions name the same storage
    AssertSameAddress {
        lhs: Expr,
        rhs: Expr,
    },
}

impl Instruction {
    pub fn declare(name: &str, kind: BindingKind, init: Option<Expr>) -> Self {
        Instruction::Declare {
            name: name.to_string(),
            kind,
            init,
        }
    }

    pub fn assign(place: Place, value: Expr) -> Self {
        Instruction::Assign { place, value }
    }

    pub fn call(function: &str, arg: Expr) -> Self {
        Instruction::Call {
            function: function.to_string(),
            arg,
        }
    }

    pub fn print<const N: usize>(fragments: [Fragment; N]) -> Self {
        Instruction::Print(Vec::from(fragments))
    }
}

/// The single parameter of a helper function
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub kind: BindingKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub param: Param,
    pub body: Vec<Instruction>,
}

impl FunctionDef {
    /// C-style signature for display, e.g. `void f(int &x)`
    pub fn signature(&self) -> String {
        let param = match self.param.kind {
            BindingKind::Int => format!("int {}", self.param.name),
            BindingKind::Pointer => format!("int *{}", self.param.name),
            BindingKind::Reference => format!("int &{}", self.param.name),
        };
        format!("void {}({})", self.name, param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_use_c_spelling() {
        let f = FunctionDef {
            name: "set".to_string(),
            param: Param {
                name: "x".to_string(),
                kind: BindingKind::Reference,
            },
            body: Vec::new(),
        };
        assert_eq!(f.signature(), "void set(int &x)");
    }

    #[test]
    fn print_accepts_mixed_fragments() {
        let line = Instruction::print([Fragment::from("x is "), Expr::var("x").into()]);
        assert_eq!(
            line,
            Instruction::Print(vec![
                Fragment::Text("x is ".to_string()),
                Fragment::Value(Expr::Var("x".to_string())),
            ])
        );
    }
}
