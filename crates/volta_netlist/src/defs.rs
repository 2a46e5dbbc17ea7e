//! User-defined function and task definitions.

use crate::ids::ObjId;
use crate::stmt::Statement;

/// A user-defined function.
///
/// Ports are signals inside the function's scope; port 0 is the result
/// signal. The body statement is installed exactly once, after the ports
/// exist, because functions may reference each other.
#[derive(Debug)]
pub struct FuncDef {
    name: String,
    ports: Vec<ObjId>,
    statement: Option<Statement>,
}

impl FuncDef {
    /// Creates a definition with its port signals and no body yet.
    pub fn new(name: impl Into<String>, ports: Vec<ObjId>) -> Self {
        Self {
            name: name.into(),
            ports,
            statement: None,
        }
    }

    /// Returns the function's fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Installs the body statement.
    ///
    /// # Panics
    ///
    /// Panics if a body was already installed.
    pub fn set_statement(&mut self, statement: Statement) {
        assert!(
            self.statement.is_none(),
            "function {} already has a body",
            self.name
        );
        self.statement = Some(statement);
    }

    /// Returns the body statement, if installed.
    pub fn statement(&self) -> Option<&Statement> {
        self.statement.as_ref()
    }

    /// Returns the number of ports.
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Returns the signal backing the given port.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn port(&self, idx: usize) -> ObjId {
        self.ports[idx]
    }
}

/// A user-defined task. Same shape as a function, without a result port.
#[derive(Debug)]
pub struct TaskDef {
    name: String,
    ports: Vec<ObjId>,
    statement: Option<Statement>,
}

impl TaskDef {
    /// Creates a definition with its port signals and no body yet.
    pub fn new(name: impl Into<String>, ports: Vec<ObjId>) -> Self {
        Self {
            name: name.into(),
            ports,
            statement: None,
        }
    }

    /// Returns the task's fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Installs the body statement.
    ///
    /// # Panics
    ///
    /// Panics if a body was already installed.
    pub fn set_statement(&mut self, statement: Statement) {
        assert!(
            self.statement.is_none(),
            "task {} already has a body",
            self.name
        );
        self.statement = Some(statement);
    }

    /// Returns the body statement, if installed.
    pub fn statement(&self) -> Option<&Statement> {
        self.statement.as_ref()
    }

    /// Returns the number of ports.
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Returns the signal backing the given port.
    pub fn port(&self, idx: usize) -> ObjId {
        self.ports[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Design;
    use crate::signal::SignalKind;
    use crate::stmt::{BlockKind, Statement};

    #[test]
    fn func_def_body_once() {
        let mut design = Design::new();
        let res = design.new_signal_width(None, "top.f.f", SignalKind::Reg, 8);
        let mut def = FuncDef::new("top.f", vec![res]);
        assert!(def.statement().is_none());
        def.set_statement(Statement::block(BlockKind::Sequential));
        assert!(def.statement().is_some());
        assert_eq!(def.port_count(), 1);
        assert_eq!(def.port(0), res);
    }

    #[test]
    #[should_panic(expected = "already has a body")]
    fn func_def_second_body_panics() {
        let mut def = FuncDef::new("top.f", vec![]);
        def.set_statement(Statement::block(BlockKind::Sequential));
        def.set_statement(Statement::block(BlockKind::Sequential));
    }

    #[test]
    fn task_def_ports() {
        let mut design = Design::new();
        let a = design.new_signal_width(None, "top.t.a", SignalKind::Reg, 1);
        let b = design.new_signal_width(None, "top.t.b", SignalKind::Reg, 1);
        let def = TaskDef::new("top.t", vec![a, b]);
        assert_eq!(def.port_count(), 2);
        assert_eq!(def.port(1), b);
        assert_eq!(def.name(), "top.t");
    }
}
