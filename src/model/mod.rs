/*!
A model for AWS-IAM-style policy documents: `Policy`, `Statement`, `Action`, `Resource`,
`Condition`, and the `QualifiedName`/`Namespace` identifier syntax they share.

# Policy Grammar

```plain,ignore
policy  = {
     <version_block?>
     <id_block?>
     <statement_block>
}

<version_block> = "Version" : ("2008-10-17" | "2012-10-17")

<id_block> = "Id" : <policy_id_string>

<statement_block> = "Statement" : (<statement> | [ <statement>, <statement>, ... ])

<statement> = {
    <sid_block?>,
    <effect_block>,
    <action_block>,
    <resource_block>,
    <condition_block?>
}

<sid_block> = "Sid" : <sid_string>

<effect_block> = "Effect" : ("Allow" | "Deny")

<action_block> = ("Action" | "NotAction") :
    ("*" | [<action_string>, <action_string>, ...])

<resource_block> = ("Resource" | "NotResource") :
    ("*" | [<resource_string>, <resource_string>, ...])

<condition_block> = "Condition" : { <condition_map> }
<condition_map> = {
  <condition_type_string> : { <condition_key_string> : <condition_value_list> },
  <condition_type_string> : { <condition_key_string> : <condition_value_list> }, ...
}
<condition_value_list> = [<condition_value>, <condition_value>, ...]
<condition_value> = ("string" | "number" | "Boolean")
```

## Grammar Notes

1. `Principal`/`NotPrincipal` are not part of this model — the algebra reasons over the
   permissions granted to a single, already-resolved principal, so the principal block is
   stripped out upstream during ingest rather than carried through the model.
1. The `id_block` constraint that it is allowed only in resource-based policies is not
   enforced here.
1. `resource_string` is a wildcardable pattern string, not a parsed ARN; the algebra compares
   patterns directly rather than ARN components.
*/

mod action;
pub mod builder;
mod condition;
pub mod containers;
mod effect;
mod naming;
mod policy;
mod resource;
mod statement;
mod version;

pub use action::Action;
pub use condition::{Condition, ConditionValue, GlobalOperator, Match, Operator, Quantifier};
pub use containers::{MaybeAny, OneOrAll, OrAny};
pub use effect::Effect;
pub use naming::{Namespace, QualifiedName};
pub use policy::Policy;
pub use resource::Resource;
pub use statement::Statement;
pub use version::Version;
