//! Language catalog.
//!
//! ## Learning: Newtypes
//!
//! `LanguageId` wraps a `String` so a language identifier cannot be mixed
//! up with source text or a store key. Only the catalog hands out ids that
//! are known to be valid.

use runpad_piston::Runtime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Config;
use crate::{CoreError, CoreResult};

/// Identifier of a catalog entry (`"python"`, `"rust"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageId(String);

impl LanguageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Static description of one supported language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    pub id: LanguageId,

    /// Display label
    pub label: String,

    /// Syntax mode name for the editing surface
    pub mode: String,

    /// Starter source text
    pub default_code: String,

    /// Execution target
    pub runtime: Runtime,
}

impl LanguageProfile {
    fn builtin(id: &str, label: &str, version: &str, default_code: &str) -> Self {
        Self {
            id: LanguageId::new(id),
            label: label.to_string(),
            mode: id.to_string(),
            default_code: default_code.to_string(),
            runtime: Runtime::new(id, version),
        }
    }
}

/// Read-only set of language profiles, in menu order.
#[derive(Debug, Clone)]
pub struct Catalog {
    profiles: Vec<LanguageProfile>,
}

impl Catalog {
    /// The languages shipped with the editor.
    pub fn builtin() -> Self {
        Self {
            profiles: vec![
                LanguageProfile::builtin("javascript", "JavaScript", "18.15.0", JAVASCRIPT),
                LanguageProfile::builtin("typescript", "TypeScript", "5.0.3", TYPESCRIPT),
                LanguageProfile::builtin("python", "Python", "3.10.0", PYTHON),
                LanguageProfile::builtin("java", "Java", "15.0.2", JAVA),
                LanguageProfile::builtin("go", "Go", "1.16.2", GO),
                LanguageProfile::builtin("rust", "Rust", "1.68.2", RUST),
                LanguageProfile::builtin("cpp", "C++", "10.2.0", CPP),
                LanguageProfile::builtin("csharp", "C#", "6.12.0", CSHARP),
                LanguageProfile::builtin("ruby", "Ruby", "3.0.1", RUBY),
                LanguageProfile::builtin("swift", "Swift", "5.3.3", SWIFT),
            ],
        }
    }

    /// Built-in languages with the config's `[languages.*]` tables applied.
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        let mut catalog = Self::builtin();

        for (id, overrides) in &config.languages {
            match catalog.profiles.iter_mut().find(|p| p.id.as_str() == id) {
                Some(profile) => {
                    if let Some(label) = &overrides.label {
                        profile.label = label.clone();
                    }
                    if let Some(mode) = &overrides.mode {
                        profile.mode = mode.clone();
                    }
                    if let Some(runtime) = &overrides.runtime {
                        profile.runtime.language = runtime.clone();
                    }
                    if let Some(version) = &overrides.version {
                        profile.runtime.version = version.clone();
                    }
                    if let Some(code) = &overrides.default_code {
                        profile.default_code = code.clone();
                    }
                    tracing::debug!("Overrode language profile {}", id);
                }
                None => {
                    let (Some(runtime), Some(version)) = (&overrides.runtime, &overrides.version)
                    else {
                        return Err(CoreError::Config(format!(
                            "language `{id}` is not built in and needs both `runtime` and `version`"
                        )));
                    };
                    catalog.profiles.push(LanguageProfile {
                        id: LanguageId::new(id.as_str()),
                        label: overrides.label.clone().unwrap_or_else(|| id.clone()),
                        mode: overrides.mode.clone().unwrap_or_else(|| id.clone()),
                        default_code: overrides.default_code.clone().unwrap_or_default(),
                        runtime: Runtime::new(runtime.as_str(), version.as_str()),
                    });
                    tracing::debug!("Added language profile {}", id);
                }
            }
        }

        Ok(catalog)
    }

    /// Looks up a profile.
    pub fn get(&self, id: &str) -> Option<&LanguageProfile> {
        self.profiles.iter().find(|p| p.id.as_str() == id)
    }

    /// Looks up a profile, failing on unknown ids.
    pub fn profile(&self, id: &str) -> CoreResult<&LanguageProfile> {
        self.get(id)
            .ok_or_else(|| CoreError::UnknownLanguage(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ==================== Starter code ====================

const JAVASCRIPT: &str = r#"// JavaScript Playground
const numbers = [1, 2, 3, 4, 5];

// Map numbers to their squares
const squares = numbers.map(n => n * n);
console.log('Original numbers:', numbers);
console.log('Squared numbers:', squares);

// Sum numbers using reduce
const sum = numbers.reduce((acc, curr) => acc + curr, 0);
console.log('Sum of numbers:', sum);
"#;

const TYPESCRIPT: &str = r#"// TypeScript Playground
interface NumberArray {
  numbers: number[];
  sum(): number;
}

const data: NumberArray = {
  numbers: [1, 2, 3, 4, 5],
  sum() {
    return this.numbers.reduce((acc, curr) => acc + curr, 0);
  },
};

console.log('Numbers:', data.numbers);
console.log('Sum:', data.sum());
"#;

const PYTHON: &str = r#"# Python Playground
numbers = [1, 2, 3, 4, 5]

# Map numbers to their squares
squares = [n ** 2 for n in numbers]
print(f"Original numbers: {numbers}")
print(f"Squared numbers: {squares}")

# Sum numbers
print(f"Sum of numbers: {sum(numbers)}")
"#;

const JAVA: &str = r#"public class Main {
    public static void main(String[] args) {
        int[] numbers = {1, 2, 3, 4, 5};

        int sum = 0;
        for (int n : numbers) {
            sum += n;
        }

        System.out.println("Sum of numbers: " + sum);
    }
}
"#;

const GO: &str = r#"package main

import "fmt"

func main() {
	numbers := []int{1, 2, 3, 4, 5}

	sum := 0
	for _, n := range numbers {
		sum += n
	}

	fmt.Println("Sum of numbers:", sum)
}
"#;

const RUST: &str = r#"fn main() {
    let numbers = vec![1, 2, 3, 4, 5];

    let squares: Vec<i32> = numbers.iter().map(|n| n * n).collect();
    println!("Original numbers: {:?}", numbers);
    println!("Squared numbers: {:?}", squares);

    let sum: i32 = numbers.iter().sum();
    println!("Sum of numbers: {}", sum);
}
"#;

const CPP: &str = r#"#include <iostream>
#include <numeric>
#include <vector>

int main() {
    std::vector<int> numbers = {1, 2, 3, 4, 5};

    int sum = std::accumulate(numbers.begin(), numbers.end(), 0);
    std::cout << "Sum of numbers: " << sum << std::endl;

    return 0;
}
"#;

const CSHARP: &str = r#"using System;
using System.Linq;

class Program {
    static void Main() {
        var numbers = new[] { 1, 2, 3, 4, 5 };

        var squares = numbers.Select(n => n * n);
        Console.WriteLine($"Squared numbers: {string.Join(", ", squares)}");
        Console.WriteLine($"Sum of numbers: {numbers.Sum()}");
    }
}
"#;

const RUBY: &str = r#"# Ruby Playground
numbers = [1, 2, 3, 4, 5]

squares = numbers.map { |n| n * n }
puts "Original numbers: #{numbers.inspect}"
puts "Squared numbers: #{squares.inspect}"
puts "Sum of numbers: #{numbers.sum}"
"#;

const SWIFT: &str = r#"// Swift Playground
let numbers = [1, 2, 3, 4, 5]

let squares = numbers.map { $0 * $0 }
print("Original numbers: \(numbers)")
print("Squared numbers: \(squares)")
print("Sum of numbers: \(numbers.reduce(0, +))")
"#;
