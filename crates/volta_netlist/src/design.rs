//! The design root: arenas, registries, rings, and entity lifecycle.

use crate::arena::SlotArena;
use crate::defs::{FuncDef, TaskDef};
use crate::expr::Expr;
use crate::ids::{MemoryId, ObjId, PinId};
use crate::obj::{Obj, ObjKind};
use crate::path::{resolve_upward, ScopePath};
use crate::pin::{Pin, PinDir};
use crate::ram::Memory;
use crate::scope::{Scope, ScopeKind};
use crate::stmt::Process;
use std::collections::HashMap;
use volta_diagnostics::{Diagnostic, DiagnosticSink};
use volta_source::SourceLoc;

/// The root container of an elaborated design.
///
/// The design owns every pin, object, and memory. Registered signals and
/// nodes are additionally threaded onto design-wide circular rings so
/// passes can iterate them; scopes, parameters, memories, functions, and
/// tasks are indexed by fully qualified dotted name with upward scope
/// resolution.
pub struct Design {
    pub(crate) pins: SlotArena<PinId, Pin>,
    pub(crate) objs: SlotArena<ObjId, Obj>,
    pub(crate) memories: SlotArena<MemoryId, Memory>,
    memory_names: HashMap<String, MemoryId>,
    scopes: HashMap<String, Scope>,
    parameters: HashMap<String, Expr>,
    functions: HashMap<String, FuncDef>,
    tasks: HashMap<String, TaskDef>,
    flags: HashMap<String, String>,
    signals_head: Option<ObjId>,
    nodes_head: Option<ObjId>,
    processes: Vec<Process>,
    pub(crate) sink: DiagnosticSink,
    lcounter: u32,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self {
            pins: SlotArena::new(),
            objs: SlotArena::new(),
            memories: SlotArena::new(),
            memory_names: HashMap::new(),
            scopes: HashMap::new(),
            parameters: HashMap::new(),
            functions: HashMap::new(),
            tasks: HashMap::new(),
            flags: HashMap::new(),
            signals_head: None,
            nodes_head: None,
            processes: Vec::new(),
            sink: DiagnosticSink::new(),
            lcounter: 0,
        }
    }

    // --- object and pin access -------------------------------------------

    /// Returns the object with the given id.
    pub fn obj(&self, id: ObjId) -> &Obj {
        &self.objs[id]
    }

    /// Returns the mutable object with the given id.
    pub fn obj_mut(&mut self, id: ObjId) -> &mut Obj {
        &mut self.objs[id]
    }

    /// Returns the pin with the given id.
    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id]
    }

    /// Returns the mutable pin with the given id.
    pub fn pin_mut(&mut self, id: PinId) -> &mut Pin {
        &mut self.pins[id]
    }

    /// Creates an object with `npins` fresh singleton-ring pins.
    pub(crate) fn alloc_obj(&mut self, name: String, npins: u32, kind: ObjKind) -> ObjId {
        let id = self.objs.insert(Obj::new(name, kind));
        for idx in 0..npins {
            let pin = self.pins.insert_with_key(|k| Pin::new(k, id, idx));
            self.objs[id].push_pin(pin);
        }
        id
    }

    /// Sets direction, role name, and instance number of one pin.
    pub(crate) fn set_pin_role(&mut self, obj: ObjId, idx: u32, dir: PinDir, name: &str, inst: u32) {
        let pin = self.objs[obj].pin(idx);
        let p = &mut self.pins[pin];
        p.set_dir(dir);
        p.set_name(name, inst);
    }

    // --- diagnostics ------------------------------------------------------

    /// Returns the diagnostic sink.
    pub fn sink(&self) -> &DiagnosticSink {
        &self.sink
    }

    /// Returns the number of elaboration errors recorded so far. A
    /// non-zero count aborts the compiler before any backend runs.
    pub fn errors(&self) -> usize {
        self.sink.error_count()
    }

    /// Records an elaboration error at the given location.
    pub fn error(&self, loc: SourceLoc, message: impl Into<String>) {
        self.sink.emit(Diagnostic::error(message, loc));
    }

    // --- scopes -----------------------------------------------------------

    /// Creates the root scope of the design hierarchy.
    pub fn make_root_scope(&mut self, name: &str) -> ScopePath {
        let path = ScopePath::new(name);
        self.scopes.insert(
            name.to_string(),
            Scope::new(ScopeKind::Module, path.clone()),
        );
        path
    }

    /// Creates a child scope `path.name` of the given kind.
    pub fn make_scope(&mut self, path: &ScopePath, kind: ScopeKind, name: &str) -> ScopePath {
        let npath = path.join(name);
        self.scopes
            .insert(npath.as_str().to_string(), Scope::new(kind, npath.clone()));
        npath
    }

    /// Looks up a scope by its full dotted path.
    pub fn find_scope(&self, key: &str) -> Option<&Scope> {
        self.scopes.get(key)
    }

    // --- parameters -------------------------------------------------------

    /// Records a parameter under `path.name`.
    pub fn set_parameter(&mut self, path: &ScopePath, name: &str, expr: Expr) {
        self.parameters.insert(path.key(name), expr);
    }

    /// Finds a parameter visible from `path`, searching enclosing scopes
    /// upward.
    pub fn find_parameter(&self, path: &ScopePath, name: &str) -> Option<&Expr> {
        resolve_upward(&self.parameters, path, name)
    }

    // --- memories ---------------------------------------------------------

    /// Registers a memory under its name and returns its id.
    pub fn add_memory(&mut self, mem: Memory) -> MemoryId {
        let name = mem.name().to_string();
        let id = self.memories.insert(mem);
        self.memory_names.insert(name, id);
        id
    }

    /// Returns the memory with the given id.
    pub fn memory(&self, id: MemoryId) -> &Memory {
        &self.memories[id]
    }

    /// Returns the mutable memory with the given id.
    pub fn memory_mut(&mut self, id: MemoryId) -> &mut Memory {
        &mut self.memories[id]
    }

    /// Finds a memory visible from `path`, searching enclosing scopes
    /// upward.
    pub fn find_memory(&self, path: &ScopePath, name: &str) -> Option<MemoryId> {
        resolve_upward(&self.memory_names, path, name).copied()
    }

    // --- functions and tasks ----------------------------------------------

    /// Registers a function definition under its full name.
    pub fn add_function(&mut self, def: FuncDef) {
        self.functions.insert(def.name().to_string(), def);
    }

    /// Finds a function visible from `path`, searching enclosing scopes
    /// upward.
    pub fn find_function(&self, path: &ScopePath, name: &str) -> Option<&FuncDef> {
        resolve_upward(&self.functions, path, name)
    }

    /// Looks up a function by its full dotted name.
    pub fn function(&self, key: &str) -> Option<&FuncDef> {
        self.functions.get(key)
    }

    /// Looks up a function by full name for mutation (body installation).
    pub fn function_mut(&mut self, key: &str) -> Option<&mut FuncDef> {
        self.functions.get_mut(key)
    }

    /// Registers a task definition under its full name.
    pub fn add_task(&mut self, def: TaskDef) {
        self.tasks.insert(def.name().to_string(), def);
    }

    /// Finds a task visible from `path`, searching enclosing scopes upward.
    pub fn find_task(&self, path: &ScopePath, name: &str) -> Option<&TaskDef> {
        resolve_upward(&self.tasks, path, name)
    }

    /// Looks up a task by its full dotted name.
    pub fn task(&self, key: &str) -> Option<&TaskDef> {
        self.tasks.get(key)
    }

    /// Looks up a task by full name for mutation (body installation).
    pub fn task_mut(&mut self, key: &str) -> Option<&mut TaskDef> {
        self.tasks.get_mut(key)
    }

    // --- flags ------------------------------------------------------------

    /// Sets a named compilation flag.
    pub fn set_flag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.flags.insert(key.into(), value.into());
    }

    /// Returns the value of a flag, or the empty string.
    pub fn flag(&self, key: &str) -> &str {
        self.flags.get(key).map(String::as_str).unwrap_or_default()
    }

    // --- signal ring ------------------------------------------------------

    /// Registers a signal on the design's signal ring.
    ///
    /// # Panics
    ///
    /// Panics if the object is not a signal or is already registered.
    pub fn add_signal(&mut self, id: ObjId) {
        assert!(self.objs[id].is_signal(), "add_signal on a non-signal");
        self.ring_add(id, true);
    }

    /// Removes a signal from the design's signal ring. The signal itself
    /// stays alive; ownership passes to the caller.
    pub fn del_signal(&mut self, id: ObjId) {
        assert!(self.objs[id].is_signal(), "del_signal on a non-signal");
        self.ring_del(id, true);
    }

    /// Registers a device node on the design's node ring.
    ///
    /// # Panics
    ///
    /// Panics if the object is a signal or is already registered.
    pub fn add_node(&mut self, id: ObjId) {
        assert!(!self.objs[id].is_signal(), "add_node on a signal");
        self.ring_add(id, false);
    }

    /// Removes a device node from the design's node ring.
    pub fn del_node(&mut self, id: ObjId) {
        assert!(!self.objs[id].is_signal(), "del_node on a signal");
        self.ring_del(id, false);
    }

    fn ring_add(&mut self, id: ObjId, signal_ring: bool) {
        assert!(
            !self.objs[id].registered,
            "object {} is already registered",
            self.objs[id].name()
        );
        let head = if signal_ring {
            self.signals_head
        } else {
            self.nodes_head
        };
        match head {
            None => {
                let obj = &mut self.objs[id];
                obj.ring_next = Some(id);
                obj.ring_prev = Some(id);
            }
            Some(h) => {
                let after = self.objs[h].ring_next.expect("ring head has links");
                self.objs[id].ring_next = Some(after);
                self.objs[id].ring_prev = Some(h);
                self.objs[after].ring_prev = Some(id);
                self.objs[h].ring_next = Some(id);
            }
        }
        self.objs[id].registered = true;
        if signal_ring {
            self.signals_head = Some(id);
        } else {
            self.nodes_head = Some(id);
        }
    }

    // The head pointer is updated from the invariant "head is null iff
    // ring is empty": sole element clears the head, removed head moves
    // the head to the predecessor.
    fn ring_del(&mut self, id: ObjId, signal_ring: bool) {
        assert!(
            self.objs[id].registered,
            "object {} is not registered",
            self.objs[id].name()
        );
        let next = self.objs[id].ring_next.expect("registered object has links");
        let prev = self.objs[id].ring_prev.expect("registered object has links");
        let head = if signal_ring {
            self.signals_head
        } else {
            self.nodes_head
        };
        let new_head = if next == id {
            None
        } else {
            self.objs[prev].ring_next = Some(next);
            self.objs[next].ring_prev = Some(prev);
            if head == Some(id) {
                Some(prev)
            } else {
                head
            }
        };
        if signal_ring {
            self.signals_head = new_head;
        } else {
            self.nodes_head = new_head;
        }
        let obj = &mut self.objs[id];
        obj.ring_next = None;
        obj.ring_prev = None;
        obj.registered = false;
    }

    /// Returns the registered signals in ring order.
    pub fn signal_ids(&self) -> Vec<ObjId> {
        self.ring_ids(self.signals_head)
    }

    /// Returns the registered device nodes in ring order.
    pub fn node_ids(&self) -> Vec<ObjId> {
        self.ring_ids(self.nodes_head)
    }

    fn ring_ids(&self, head: Option<ObjId>) -> Vec<ObjId> {
        let mut out = Vec::new();
        let Some(head) = head else {
            return out;
        };
        let mut cur = head;
        loop {
            out.push(cur);
            cur = self.objs[cur].ring_next.expect("registered object has links");
            if cur == head {
                break;
            }
        }
        out
    }

    /// Finds a registered signal visible from `path` by short name,
    /// searching enclosing scopes upward.
    pub fn find_signal(&self, path: &ScopePath, name: &str) -> Option<ObjId> {
        let head = self.signals_head?;
        let mut scope = Some(path.clone());
        while let Some(cur_path) = scope {
            let fullname = cur_path.key(name);
            let mut cur = head;
            loop {
                if self.objs[cur].name() == fullname {
                    return Some(cur);
                }
                cur = self.objs[cur].ring_prev.expect("registered signal has links");
                if cur == head {
                    break;
                }
            }
            scope = cur_path.parent();
        }
        None
    }

    /// Clears the traversal mark of every registered signal.
    pub fn clear_signal_marks(&mut self) {
        self.clear_ring_marks(self.signals_head);
    }

    /// Clears the traversal mark of every registered device node.
    pub fn clear_node_marks(&mut self) {
        self.clear_ring_marks(self.nodes_head);
    }

    fn clear_ring_marks(&mut self, head: Option<ObjId>) {
        let Some(head) = head else {
            return;
        };
        let mut cur = head;
        loop {
            self.objs[cur].set_mark(false);
            cur = self.objs[cur].ring_next.expect("registered object has links");
            if cur == head {
                break;
            }
        }
    }

    /// Finds the first unmarked registered node matching the predicate.
    /// Rewriting passes mark what they consume and call this repeatedly.
    pub fn find_node_where(&self, pred: impl Fn(&Obj) -> bool) -> Option<ObjId> {
        self.find_in_ring(self.nodes_head, pred)
    }

    /// Finds the first unmarked registered signal matching the predicate.
    pub fn find_signal_where(&self, pred: impl Fn(&Obj) -> bool) -> Option<ObjId> {
        self.find_in_ring(self.signals_head, pred)
    }

    fn find_in_ring(&self, head: Option<ObjId>, pred: impl Fn(&Obj) -> bool) -> Option<ObjId> {
        let head = head?;
        let start = self.objs[head].ring_next.expect("registered object has links");
        let mut cur = start;
        loop {
            let obj = &self.objs[cur];
            if !obj.mark() && pred(obj) {
                return Some(cur);
            }
            cur = obj.ring_next.expect("registered object has links");
            if cur == start {
                break;
            }
        }
        None
    }

    // --- processes --------------------------------------------------------

    /// Appends a behavioral process to the design.
    pub fn add_process(&mut self, process: Process) {
        self.processes.push(process);
    }

    /// Returns the design's processes.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Deletes the process at the given position.
    pub fn delete_process(&mut self, idx: usize) {
        self.processes.remove(idx);
    }

    // --- lifecycle --------------------------------------------------------

    /// Destroys an object: deregisters it from its ring if registered,
    /// removes a RAM port from its memory's port list, unlinks and frees
    /// all pins, and frees the object slot.
    ///
    /// # Panics
    ///
    /// Panics if the object is a signal with live expression references.
    pub fn delete_obj(&mut self, id: ObjId) {
        {
            let obj = &self.objs[id];
            if let Some(sig) = obj.as_signal() {
                assert_eq!(
                    sig.eref(),
                    0,
                    "signal {} deleted while expressions still reference it",
                    obj.name()
                );
            }
        }
        if self.objs[id].registered {
            if self.objs[id].is_signal() {
                self.del_signal(id);
            } else {
                self.del_node(id);
            }
        }
        let mem = match self.objs[id].kind() {
            ObjKind::RamPort(port) => Some(port.mem()),
            _ => None,
        };
        if let Some(mem) = mem {
            self.memories[mem].remove_port(id);
        }
        let pins = self.objs[id].pins().to_vec();
        for pin in pins {
            self.unlink(pin);
            self.pins.remove(pin);
        }
        self.objs.remove(id);
    }

    /// Generates a fresh local symbol name `path._L<n>` for temporaries.
    pub fn local_symbol(&mut self, path: &ScopePath) -> String {
        let n = self.lcounter;
        self.lcounter += 1;
        format!("{path}._L{n}")
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use crate::signal::SignalKind;
    use crate::stmt::{BlockKind, ProcessKind, Statement};
    use volta_common::LogicVec;

    fn sig(design: &mut Design, name: &str) -> ObjId {
        design.new_signal_width(None, name, SignalKind::Wire, 1)
    }

    #[test]
    fn signal_ring_add_and_iterate() {
        let mut design = Design::new();
        let a = sig(&mut design, "top.a");
        let b = sig(&mut design, "top.b");
        let c = sig(&mut design, "top.c");
        design.add_signal(a);
        design.add_signal(b);
        design.add_signal(c);
        let ids = design.signal_ids();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&a) && ids.contains(&b) && ids.contains(&c));
    }

    #[test]
    fn ring_del_sole_element_empties_ring() {
        let mut design = Design::new();
        let a = sig(&mut design, "top.a");
        design.add_signal(a);
        design.del_signal(a);
        assert!(design.signal_ids().is_empty());
        // The signal itself is still alive
        assert_eq!(design.obj(a).name(), "top.a");
    }

    #[test]
    fn ring_del_head_element() {
        let mut design = Design::new();
        let a = sig(&mut design, "top.a");
        let b = sig(&mut design, "top.b");
        let c = sig(&mut design, "top.c");
        design.add_signal(a);
        design.add_signal(b);
        design.add_signal(c);
        // c is the current head
        design.del_signal(c);
        let ids = design.signal_ids();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a) && ids.contains(&b));
    }

    #[test]
    fn ring_del_middle_element() {
        let mut design = Design::new();
        let a = sig(&mut design, "top.a");
        let b = sig(&mut design, "top.b");
        let c = sig(&mut design, "top.c");
        design.add_signal(a);
        design.add_signal(b);
        design.add_signal(c);
        design.del_signal(b);
        let ids = design.signal_ids();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a) && ids.contains(&c));
        // Re-registration works after removal
        design.add_signal(b);
        assert_eq!(design.signal_ids().len(), 3);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn double_registration_panics() {
        let mut design = Design::new();
        let a = sig(&mut design, "top.a");
        design.add_signal(a);
        design.add_signal(a);
    }

    #[test]
    #[should_panic(expected = "add_node on a signal")]
    fn signal_on_node_ring_panics() {
        let mut design = Design::new();
        let a = sig(&mut design, "top.a");
        design.add_node(a);
    }

    #[test]
    fn find_signal_upward() {
        let mut design = Design::new();
        let a = sig(&mut design, "top.sub.w");
        design.add_signal(a);
        let inner = ScopePath::new("top.sub.block");
        assert_eq!(design.find_signal(&inner, "w"), Some(a));
        let elsewhere = ScopePath::new("top.other");
        assert_eq!(design.find_signal(&elsewhere, "w"), None);
    }

    #[test]
    fn marks_and_predicate_finder() {
        let mut design = Design::new();
        let g1 = design.new_bufz("b1");
        let g2 = design.new_bufz("b2");
        design.add_node(g1);
        design.add_node(g2);

        let found = design.find_node_where(|obj| obj.name().starts_with('b'));
        let first = found.expect("unmarked node exists");
        design.obj_mut(first).set_mark(true);
        let second = design
            .find_node_where(|obj| obj.name().starts_with('b'))
            .expect("one node still unmarked");
        assert_ne!(first, second);
        design.obj_mut(second).set_mark(true);
        assert!(design
            .find_node_where(|obj| obj.name().starts_with('b'))
            .is_none());

        design.clear_node_marks();
        assert!(design
            .find_node_where(|obj| obj.name().starts_with('b'))
            .is_some());
    }

    #[test]
    fn signal_predicate_finder_respects_marks() {
        let mut design = Design::new();
        let a = sig(&mut design, "top.a");
        let b = sig(&mut design, "top.b");
        design.add_signal(a);
        design.add_signal(b);

        let first = design
            .find_signal_where(|obj| obj.as_signal().is_some())
            .expect("unmarked signal exists");
        design.obj_mut(first).set_mark(true);
        let second = design
            .find_signal_where(|obj| obj.as_signal().is_some())
            .expect("one signal left");
        assert_ne!(first, second);
        design.obj_mut(second).set_mark(true);
        assert!(design.find_signal_where(|_| true).is_none());
        design.clear_signal_marks();
        assert!(design.find_signal_where(|_| true).is_some());
    }

    #[test]
    fn function_body_installed_by_name() {
        let mut design = Design::new();
        design.add_function(crate::defs::FuncDef::new("top.f", Vec::new()));
        design
            .function_mut("top.f")
            .expect("function registered")
            .set_statement(Statement::block(BlockKind::Sequential));
        assert!(design.function("top.f").unwrap().statement().is_some());

        design.add_task(crate::defs::TaskDef::new("top.t", Vec::new()));
        design
            .task_mut("top.t")
            .expect("task registered")
            .set_statement(Statement::block(BlockKind::Sequential));
        assert!(design.task("top.t").unwrap().statement().is_some());
    }

    #[test]
    fn scope_registry() {
        let mut design = Design::new();
        let root = design.make_root_scope("top");
        let sub = design.make_scope(&root, ScopeKind::BeginEnd, "blk");
        assert_eq!(sub.as_str(), "top.blk");
        assert_eq!(
            design.find_scope("top.blk").map(|s| s.kind()),
            Some(ScopeKind::BeginEnd)
        );
        assert!(design.find_scope("top.missing").is_none());
    }

    #[test]
    fn parameter_upward_lookup() {
        let mut design = Design::new();
        let scope = ScopePath::new("top.sub.block");
        design.set_parameter(
            &scope,
            "K",
            Expr::constant(LogicVec::from_u64(5, 4), volta_source::SourceLoc::NONE),
        );
        let inner = scope.join("inner");
        assert!(design.find_parameter(&inner, "K").is_some());
        assert!(design
            .find_parameter(&ScopePath::new("top.other"), "K")
            .is_none());
    }

    #[test]
    fn flags_default_empty() {
        let mut design = Design::new();
        assert_eq!(design.flag("target"), "");
        design.set_flag("target", "xnf");
        assert_eq!(design.flag("target"), "xnf");
    }

    #[test]
    fn local_symbols_are_unique() {
        let mut design = Design::new();
        let path = ScopePath::new("top");
        let a = design.local_symbol(&path);
        let b = design.local_symbol(&path);
        assert_eq!(a, "top._L0");
        assert_eq!(b, "top._L1");
        assert_ne!(a, b);
    }

    #[test]
    fn process_list() {
        let mut design = Design::new();
        design.add_process(Process::new(
            ProcessKind::Initial,
            Statement::block(BlockKind::Sequential),
        ));
        design.add_process(Process::new(
            ProcessKind::Always,
            Statement::block(BlockKind::Sequential),
        ));
        assert_eq!(design.processes().len(), 2);
        assert_eq!(design.processes()[0].kind(), ProcessKind::Initial);
        design.delete_process(0);
        assert_eq!(design.processes().len(), 1);
        assert_eq!(design.processes()[0].kind(), ProcessKind::Always);
    }

    #[test]
    fn delete_obj_frees_pins_and_ring_slot() {
        let mut design = Design::new();
        let a = sig(&mut design, "top.a");
        design.add_signal(a);
        design.delete_obj(a);
        assert!(design.signal_ids().is_empty());
        assert!(!design.objs.contains(a));
    }

    #[test]
    #[should_panic(expected = "still reference it")]
    fn delete_referenced_signal_panics() {
        let mut design = Design::new();
        let a = sig(&mut design, "top.a");
        let _expr = Expr::signal(&design, a, volta_source::SourceLoc::NONE);
        design.delete_obj(a);
    }

    #[test]
    fn errors_count_via_sink() {
        let design = Design::new();
        assert_eq!(design.errors(), 0);
        design.error(volta_source::SourceLoc::NONE, "something is wrong");
        assert_eq!(design.errors(), 1);
        assert!(design.sink().has_errors());
    }
}
