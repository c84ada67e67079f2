use crate::filter::Selection;
use crate::form::DraftField;
use crate::model::{ExerciseId, Vocabulary};
use crate::translate::TranslatableField;
use crate::utils;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Inline(String),
    File(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranslateScope {
    All,
    Fields(Vec<TranslatableField>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    List,
    Next,
    Prev,
    Page(usize),
    Size(usize),
    Search(String),
    Filter {
        vocabulary: Vocabulary,
        selection: Selection,
    },
    Clear,
    Show(ExerciseId),
    Add(Payload),
    Edit(ExerciseId, Payload),
    Set {
        id: ExerciseId,
        field: DraftField,
        value: String,
    },
    Toggle {
        id: ExerciseId,
        field: DraftField,
        value: String,
    },
    Delete(ExerciseId),
    Undo,
    Load(String),
    Save(Option<String>),
    Translate {
        id: ExerciseId,
        scope: TranslateScope,
    },
    Key(String),
    Vocab(Option<Vocabulary>),
    Help,
    Quit,
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    }
}

fn require<'a>(value: &'a str, usage: &str) -> Result<&'a str, String> {
    if value.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(value)
    }
}

fn parse_number(value: &str, usage: &str) -> Result<usize, String> {
    require(value, usage)?
        .parse::<usize>()
        .map_err(|_| format!("invalid number '{value}', usage: {usage}"))
}

fn parse_payload(value: &str, usage: &str) -> Result<Payload, String> {
    let value = require(value, usage)?;
    match value.strip_prefix('@') {
        Some(path) if !path.trim().is_empty() => Ok(Payload::File(path.trim().to_string())),
        Some(_) => Err(format!("missing file after '@', usage: {usage}")),
        None => Ok(Payload::Inline(value.to_string())),
    }
}

pub fn parse_selection(vocabulary: Vocabulary, value: &str) -> Result<Selection, String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(Selection::All);
    }
    vocabulary
        .canonicalize(value)
        .map(|canonical| Selection::Only(canonical.to_string()))
        .ok_or_else(|| {
            format!(
                "unknown {} '{value}' (see 'vocab {}')",
                vocabulary.label(),
                vocabulary.label()
            )
        })
}

fn parse_field_edit(rest: &str, usage: &str) -> Result<(ExerciseId, DraftField, String), String> {
    let (id, rest) = split_word(rest);
    let id = utils::parse_id(require(id, usage)?)?;
    let (field, value) = split_word(rest);
    let field = DraftField::parse(require(field, usage)?).map_err(|e| e.to_string())?;
    Ok((id, field, value.to_string()))
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let (head, rest) = split_word(line);
    let command = match head.to_lowercase().as_str() {
        "" | "list" | "ls" => Command::List,
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "page" => Command::Page(parse_number(rest, "page N")?),
        "size" => Command::Size(parse_number(rest, "size N")?),
        "search" | "/" => Command::Search(rest.to_string()),
        name @ ("category" | "equipment" | "muscle") => {
            let vocabulary = Vocabulary::parse(name)
                .ok_or_else(|| format!("unknown vocabulary '{name}'"))?;
            let usage = format!("{name} VALUE|all");
            let selection = parse_selection(vocabulary, require(rest, &usage)?)?;
            Command::Filter {
                vocabulary,
                selection,
            }
        }
        "clear" => Command::Clear,
        "show" => Command::Show(utils::parse_id(require(rest, "show ID")?)?),
        "add" => Command::Add(parse_payload(rest, "add JSON|@FILE")?),
        "edit" => {
            let usage = "edit ID JSON|@FILE";
            let (id, payload) = split_word(rest);
            let id = utils::parse_id(require(id, usage)?)?;
            Command::Edit(id, parse_payload(payload, usage)?)
        }
        "set" => {
            let (id, field, value) = parse_field_edit(rest, "set ID FIELD VALUE")?;
            Command::Set { id, field, value }
        }
        "toggle" => {
            let usage = "toggle ID FIELD VALUE";
            let (id, field, value) = parse_field_edit(rest, usage)?;
            require(&value, usage)?;
            Command::Toggle { id, field, value }
        }
        "delete" | "del" | "rm" => Command::Delete(utils::parse_id(require(rest, "delete ID")?)?),
        "undo" | "u" => Command::Undo,
        "load" | "open" => Command::Load(require(rest, "load PATH")?.to_string()),
        "save" => Command::Save(if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }),
        "translate" | "tr" => {
            let usage = "translate ID [all|name|description|instructions]";
            let (id, rest) = split_word(rest);
            let id = utils::parse_id(require(id, usage)?)?;
            let words: Vec<&str> = rest.split_whitespace().collect();
            let scope = if words.is_empty() || words.iter().any(|w| w.eq_ignore_ascii_case("all")) {
                TranslateScope::All
            } else {
                let mut fields = Vec::new();
                for word in words {
                    let field = TranslatableField::parse(word)
                        .ok_or_else(|| format!("unknown field '{word}', usage: {usage}"))?;
                    if !fields.contains(&field) {
                        fields.push(field);
                    }
                }
                TranslateScope::Fields(fields)
            };
            Command::Translate { id, scope }
        }
        "key" => Command::Key(rest.to_string()),
        "vocab" => {
            if rest.is_empty() {
                Command::Vocab(None)
            } else {
                let vocabulary = Vocabulary::parse(rest)
                    .ok_or_else(|| format!("unknown vocabulary '{rest}'"))?;
                Command::Vocab(Some(vocabulary))
            }
        }
        "help" | "?" | "h" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}', type 'help'")),
    };
    Ok(command)
}

pub fn help_text() -> &'static str {
    r#"Listing
  list | <enter>               show the current page
  next | prev                  move one page
  page N                       jump to page N
  size N                       page size (10, 20, 50, 100)
  search TEXT                  search names ('search' alone clears)
  category V|all               filter by category
  equipment V|all              filter by equipment
  muscle V|all                 filter by primary muscle
  clear                        reset search and filters
  vocab [category|equipment|muscle]
                               list allowed values

Records
  show ID                      show every field of a record
  add JSON|@FILE               create a record from a JSON draft
  edit ID JSON|@FILE           replace a record with a JSON draft
  set ID FIELD VALUE           set one field (lists: a,b for vocabularies, a|b otherwise)
  toggle ID FIELD VALUE        add or remove one equipment or muscle value
  delete ID                    delete after the undo window
  undo                         restore the pending delete

Files
  load PATH                    replace the dataset with a JSON file
  save [PATH]                  write the dataset as indented JSON

Translation
  translate ID [all|name|description|instructions]
  key VALUE                    store the API key ('key' alone removes it)

  help | quit
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_lists() {
        assert_eq!(parse_command("").unwrap(), Command::List);
        assert_eq!(parse_command("   ").unwrap(), Command::List);
        assert_eq!(parse_command("LIST").unwrap(), Command::List);
    }

    #[test]
    fn paging_commands_need_numbers() {
        assert_eq!(parse_command("page 3").unwrap(), Command::Page(3));
        assert_eq!(parse_command("size 50").unwrap(), Command::Size(50));
        assert!(parse_command("page").is_err());
        assert!(parse_command("page x").is_err());
    }

    #[test]
    fn search_keeps_inner_spaces_and_bare_search_clears() {
        assert_eq!(
            parse_command("search  bench  press ").unwrap(),
            Command::Search("bench  press".to_string())
        );
        assert_eq!(parse_command("search").unwrap(), Command::Search(String::new()));
    }

    #[test]
    fn filters_are_checked_against_vocabularies() {
        assert_eq!(
            parse_command("muscle lower back").unwrap(),
            Command::Filter {
                vocabulary: Vocabulary::Muscle,
                selection: Selection::Only("lower back".to_string()),
            }
        );
        assert_eq!(
            parse_command("equipment all").unwrap(),
            Command::Filter {
                vocabulary: Vocabulary::Equipment,
                selection: Selection::All,
            }
        );
        assert!(parse_command("category flying").is_err());
        assert!(parse_command("category").is_err());
    }

    #[test]
    fn payloads_may_come_from_files() {
        assert_eq!(
            parse_command("add @draft.json").unwrap(),
            Command::Add(Payload::File("draft.json".to_string()))
        );
        assert_eq!(
            parse_command(r#"edit 4 {"name_en":"Row"}"#).unwrap(),
            Command::Edit(4, Payload::Inline(r#"{"name_en":"Row"}"#.to_string()))
        );
        assert!(parse_command("add @").is_err());
        assert!(parse_command("edit 4").is_err());
    }

    #[test]
    fn field_edits_parse_id_field_and_value() {
        assert_eq!(
            parse_command("set 7 name_en Goblet Squat").unwrap(),
            Command::Set {
                id: 7,
                field: DraftField::NameEn,
                value: "Goblet Squat".to_string(),
            }
        );
        assert!(matches!(
            parse_command("toggle 7 equipment dumbbell").unwrap(),
            Command::Toggle { id: 7, field: DraftField::Equipment, .. }
        ));
        assert!(parse_command("toggle 7 equipment").is_err());
        assert!(parse_command("set x name_en A").is_err());
        assert!(parse_command("set 7 colour red").is_err());
    }

    #[test]
    fn translate_scope_defaults_to_all() {
        assert_eq!(
            parse_command("translate 3").unwrap(),
            Command::Translate {
                id: 3,
                scope: TranslateScope::All
            }
        );
        assert_eq!(
            parse_command("translate 3 name steps name").unwrap(),
            Command::Translate {
                id: 3,
                scope: TranslateScope::Fields(vec![
                    TranslatableField::Name,
                    TranslatableField::Instructions
                ]),
            }
        );
        assert!(parse_command("translate 3 tips").is_err());
    }

    #[test]
    fn misc_commands() {
        assert_eq!(parse_command("delete 12").unwrap(), Command::Delete(12));
        assert_eq!(parse_command("undo").unwrap(), Command::Undo);
        assert_eq!(parse_command("save").unwrap(), Command::Save(None));
        assert_eq!(
            parse_command("save out.json").unwrap(),
            Command::Save(Some("out.json".to_string()))
        );
        assert_eq!(parse_command("key").unwrap(), Command::Key(String::new()));
        assert_eq!(
            parse_command("vocab equipment").unwrap(),
            Command::Vocab(Some(Vocabulary::Equipment))
        );
        assert_eq!(parse_command("q").unwrap(), Command::Quit);
    }

    #[test]
    fn unknown_commands_are_rejected() {
        let err = parse_command("explode 3").unwrap_err();
        assert!(err.contains("unknown command"));
    }
}
