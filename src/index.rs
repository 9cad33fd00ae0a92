//! The per-class member index built from a golden mapping file.
//!
//! [`MappingIndex::parse`] streams over the mapping records, maintaining a
//! single "current class" cursor. A class becomes visible for lookup only
//! when it is committed, which happens when the next class header is seen and
//! once more when the input is exhausted. Committing only on the next header
//! would silently drop the last class in the file, so the final flush uses
//! the same commit path.

use std::collections::{BTreeMap, HashMap};

use crate::mapping::{GoldenMapping, MappingRecord};

/// Variant-specific payload of a [`GoldenMember`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind<'s> {
    /// A field of a class.
    Field {
        /// Declared type of the field, as written in the mapping file.
        ty: &'s str,
    },
    /// A method of a class.
    Method {
        /// Return type of the method.
        ty: &'s str,
        /// Raw parenthesized parameter list including the parentheses.
        /// `None` when the mapping line carried no list.
        parameters: Option<&'s str>,
    },
}

/// A single member (field or method) of a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoldenMember<'s> {
    /// Obfuscated name of the member. Within its class and namespace this is
    /// the member's identity.
    pub obfuscated: &'s str,
    /// Golden (original) name of the member.
    pub golden: &'s str,
    /// Field- or method-specific payload.
    pub kind: MemberKind<'s>,
}

impl<'s> GoldenMember<'s> {
    /// Whether this member is a field.
    pub fn is_field(&self) -> bool {
        matches!(self.kind, MemberKind::Field { .. })
    }

    /// Whether this member is a method.
    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method { .. })
    }
}

/// A bidirectional member lookup for a single namespace (the fields or the
/// methods of one class).
///
/// The two directions are kept in sync by [`insert`](Self::insert); there is
/// no deletion operation.
#[derive(Clone, Debug, Default)]
pub struct MemberMap<'s> {
    from_obfuscated: HashMap<&'s str, GoldenMember<'s>>,
    from_golden: HashMap<&'s str, GoldenMember<'s>>,
}

impl<'s> MemberMap<'s> {
    /// Inserts a member under both its names.
    ///
    /// Re-inserting an obfuscated name overwrites the previous member, last
    /// write wins. A stale golden-side key left behind by the superseded
    /// member is removed, so only the later member stays reachable from
    /// either direction.
    fn insert(&mut self, member: GoldenMember<'s>) {
        if let Some(previous) = self.from_obfuscated.insert(member.obfuscated, member) {
            if previous.golden != member.golden {
                self.from_golden.remove(previous.golden);
            }
        }
        self.from_golden.insert(member.golden, member);
    }

    /// Looks up a member by its obfuscated name.
    pub fn by_obfuscated(&self, obfuscated: &str) -> Option<&GoldenMember<'s>> {
        self.from_obfuscated.get(obfuscated)
    }

    /// Looks up a member by its golden name.
    pub fn by_golden(&self, golden: &str) -> Option<&GoldenMember<'s>> {
        self.from_golden.get(golden)
    }

    /// The number of members reachable by obfuscated name.
    pub fn len(&self) -> usize {
        self.from_obfuscated.len()
    }

    /// Whether the map holds no members.
    pub fn is_empty(&self) -> bool {
        self.from_obfuscated.is_empty()
    }
}

/// All mapping information for one class.
#[derive(Clone, Debug)]
pub struct ClassEntry<'s> {
    /// Obfuscated fully-qualified name of the class.
    pub obfuscated: &'s str,
    /// Golden (original) fully-qualified name of the class.
    pub golden: &'s str,
    fields: MemberMap<'s>,
    methods: MemberMap<'s>,
    members: Vec<GoldenMember<'s>>,
}

impl<'s> ClassEntry<'s> {
    fn new(golden: &'s str, obfuscated: &'s str) -> Self {
        Self {
            obfuscated,
            golden,
            fields: MemberMap::default(),
            methods: MemberMap::default(),
            members: Vec::new(),
        }
    }

    /// Inserts a member into the namespace matching its kind and appends it
    /// to the ordered member list.
    fn insert(&mut self, member: GoldenMember<'s>) {
        match member.kind {
            MemberKind::Field { .. } => self.fields.insert(member),
            MemberKind::Method { .. } => self.methods.insert(member),
        }
        self.members.push(member);
    }

    /// The field namespace of this class.
    pub fn fields(&self) -> &MemberMap<'s> {
        &self.fields
    }

    /// The method namespace of this class, independent from the fields.
    pub fn methods(&self) -> &MemberMap<'s> {
        &self.methods
    }

    /// All members in mapping-file order, across both namespaces.
    ///
    /// This list is append-only and keeps superseded duplicates; it exists
    /// for the substitution pass, not for lookup.
    pub fn members(&self) -> &[GoldenMember<'s>] {
        &self.members
    }
}

/// An index of all committed classes of a mapping file, addressable by either
/// class name.
#[derive(Clone, Debug, Default)]
pub struct MappingIndex<'s> {
    classes: Vec<ClassEntry<'s>>,
    by_obfuscated: BTreeMap<&'s str, usize>,
    by_golden: HashMap<&'s str, usize>,
}

impl<'s> MappingIndex<'s> {
    /// Builds the index in one forward pass over the mapping records.
    ///
    /// Unrecognized lines are skipped, as are member lines appearing before
    /// the first class header.
    pub fn parse(mapping: &GoldenMapping<'s>) -> Self {
        let mut index = Self::default();
        let mut current: Option<ClassEntry<'s>> = None;

        for record in mapping.iter().filter_map(Result::ok) {
            match record {
                MappingRecord::Class { golden, obfuscated } => {
                    if let Some(class) = current.take() {
                        index.commit(class);
                    }
                    current = Some(ClassEntry::new(golden, obfuscated));
                }
                MappingRecord::Field {
                    ty,
                    golden,
                    obfuscated,
                } => {
                    if let Some(class) = current.as_mut() {
                        class.insert(GoldenMember {
                            obfuscated,
                            golden,
                            kind: MemberKind::Field { ty },
                        });
                    }
                }
                MappingRecord::Method {
                    ty,
                    golden,
                    obfuscated,
                    parameters,
                    ..
                } => {
                    if let Some(class) = current.as_mut() {
                        class.insert(GoldenMember {
                            obfuscated,
                            golden,
                            kind: MemberKind::Method { ty, parameters },
                        });
                    }
                }
            }
        }

        // Flush the last class. Without this the final class of the file
        // would never become visible for lookup.
        if let Some(class) = current.take() {
            index.commit(class);
        }

        index
    }

    fn commit(&mut self, class: ClassEntry<'s>) {
        let slot = self.classes.len();
        self.by_obfuscated.insert(class.obfuscated, slot);
        self.by_golden.insert(class.golden, slot);
        self.classes.push(class);
    }

    /// Looks up a class by its obfuscated fully-qualified name.
    pub fn by_obfuscated(&self, name: &str) -> Option<&ClassEntry<'s>> {
        self.by_obfuscated.get(name).map(|&slot| &self.classes[slot])
    }

    /// Looks up a class by its golden fully-qualified name.
    pub fn by_golden(&self, name: &str) -> Option<&ClassEntry<'s>> {
        self.by_golden.get(name).map(|&slot| &self.classes[slot])
    }

    /// Iterates the committed classes in lexicographic order of their
    /// obfuscated names.
    ///
    /// The stable order makes the substitution pass reproducible; it carries
    /// no other meaning.
    pub fn classes(&self) -> impl Iterator<Item = &ClassEntry<'s>> {
        self.by_obfuscated.values().map(|&slot| &self.classes[slot])
    }

    /// The number of classes reachable by obfuscated name.
    pub fn len(&self) -> usize {
        self.by_obfuscated.len()
    }

    /// Whether the index holds no classes.
    pub fn is_empty(&self) -> bool {
        self.by_obfuscated.is_empty()
    }
}

impl<'s> From<&'s str> for MappingIndex<'s> {
    fn from(source: &'s str) -> Self {
        Self::parse(&GoldenMapping::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_classes_in_both_directions() {
        let index = MappingIndex::from(
            "com.example.Original -> com.example.a:\n    int value -> b\n",
        );

        let by_obf = index.by_obfuscated("com.example.a").unwrap();
        let by_golden = index.by_golden("com.example.Original").unwrap();

        assert_eq!(by_obf.obfuscated, "com.example.a");
        assert_eq!(by_obf.golden, "com.example.Original");
        assert_eq!(by_obf.obfuscated, by_golden.obfuscated);
        assert_eq!(by_obf.golden, by_golden.golden);
        assert_eq!(by_obf.members().len(), by_golden.members().len());
    }

    #[test]
    fn final_class_is_committed_at_end_of_input() {
        // no trailing header line triggers the commit of this class
        let index = MappingIndex::from(
            "com.example.Original -> com.example.a:\n    int value -> b",
        );

        let class = index.by_obfuscated("com.example.a").unwrap();
        let field = class.fields().by_obfuscated("b").unwrap();
        assert_eq!(field.golden, "value");
        assert_eq!(field.kind, MemberKind::Field { ty: "int" });
    }

    #[test]
    fn member_lines_before_any_class_are_dropped() {
        let index = MappingIndex::from(
            "    int value -> b\ncom.example.Original -> com.example.a:\n",
        );

        assert_eq!(index.len(), 1);
        let class = index.by_obfuscated("com.example.a").unwrap();
        assert!(class.fields().is_empty());
        assert!(class.members().is_empty());
    }

    #[test]
    fn members_resolve_in_both_directions() {
        let index = MappingIndex::from(
            "\
com.example.Original -> com.example.a:
    int value -> b
    11:15:void doThing(int) -> c
",
        );

        let class = index.by_obfuscated("com.example.a").unwrap();
        assert_eq!(class.fields().by_obfuscated("b").unwrap().golden, "value");
        assert_eq!(class.fields().by_golden("value").unwrap().obfuscated, "b");

        let method = class.methods().by_obfuscated("c").unwrap();
        assert_eq!(method.golden, "doThing");
        assert_eq!(
            method.kind,
            MemberKind::Method {
                ty: "void",
                parameters: Some("(int)"),
            }
        );
        assert_eq!(class.methods().by_golden("doThing").unwrap().obfuscated, "c");
    }

    #[test]
    fn duplicate_obfuscated_name_overwrites_both_directions() {
        let index = MappingIndex::from(
            "\
com.example.Original -> com.example.a:
    int first -> b
    long second -> b
",
        );

        let fields = index.by_obfuscated("com.example.a").unwrap().fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.by_obfuscated("b").unwrap().golden, "second");
        assert_eq!(fields.by_golden("second").unwrap().obfuscated, "b");
        // the superseded member is no longer reachable from either direction
        assert_eq!(fields.by_golden("first"), None);
    }

    #[test]
    fn member_list_keeps_superseded_duplicates_in_file_order() {
        let index = MappingIndex::from(
            "\
com.example.Original -> com.example.a:
    int first -> b
    long second -> b
",
        );

        let members = index.by_obfuscated("com.example.a").unwrap().members();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].golden, "first");
        assert_eq!(members[1].golden, "second");
    }

    #[test]
    fn fields_and_methods_are_independent_namespaces() {
        let index = MappingIndex::from(
            "\
com.example.Original -> com.example.a:
    int value -> b
    11:15:void doThing(int) -> b
",
        );

        let class = index.by_obfuscated("com.example.a").unwrap();
        assert!(class.fields().by_obfuscated("b").unwrap().is_field());
        assert!(class.methods().by_obfuscated("b").unwrap().is_method());
        assert_eq!(class.members().len(), 2);
    }

    #[test]
    fn classes_iterate_sorted_by_obfuscated_name() {
        let index = MappingIndex::from(
            "\
z.Last -> c.c:
a.First -> a.a:
m.Middle -> b.b:
",
        );

        let order: Vec<_> = index.classes().map(|class| class.obfuscated).collect();
        assert_eq!(order, vec!["a.a", "b.b", "c.c"]);
    }

    #[test]
    fn unrecognized_lines_are_skipped() {
        let index = MappingIndex::from(
            "\
# a comment line
com.example.Original -> com.example.a:
  badly indented -> x
    int value -> b
",
        );

        assert_eq!(index.len(), 1);
        let class = index.by_obfuscated("com.example.a").unwrap();
        assert_eq!(class.members().len(), 1);
    }
}
